pub mod admin_users;
pub mod categories;
pub mod districts;
pub mod order_items;
pub mod orders;
pub mod product_packages;
pub mod products;
pub mod promo_codes;
pub mod users;

pub use admin_users::Entity as AdminUsers;
pub use categories::Entity as Categories;
pub use districts::Entity as Districts;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_packages::Entity as ProductPackages;
pub use products::Entity as Products;
pub use promo_codes::Entity as PromoCodes;
pub use users::Entity as Users;
