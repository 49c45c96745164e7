use sea_orm::entity::prelude::*;

// Slug primary key, e.g. "salmon_smoked_001". Products are deactivated via
// is_active rather than deleted so historical order items keep a valid
// reference.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub stock_quantity: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::product_packages::Entity")]
    ProductPackages,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::product_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPackages.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
