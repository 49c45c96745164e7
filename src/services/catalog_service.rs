use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::products::{CategoryList, DistrictList, PackageList, ProductDetail, ProductList},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        districts::{Column as DistrictCol, Entity as Districts},
        product_packages::{Column as PackageCol, Entity as ProductPackages},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{Category, District, Product, ProductPackage},
    response::{ApiResponse, Meta},
    routes::params::ProductsQuery,
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .filter(CategoryCol::IsActive.eq(true))
        .order_by_asc(CategoryCol::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn category_products(
    state: &AppState,
    category_id: String,
) -> AppResult<ApiResponse<ProductList>> {
    let category = Categories::find()
        .filter(
            Condition::all()
                .add(CategoryCol::Id.eq(category_id.clone()))
                .add(CategoryCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::NotFound);
    }

    let items = Products::find()
        .filter(
            Condition::all()
                .add(ProductCol::CategoryId.eq(category_id))
                .add(ProductCol::IsActive.eq(true)),
        )
        .order_by_desc(ProductCol::IsFeatured)
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_products(
    state: &AppState,
    query: ProductsQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all().add(ProductCol::IsActive.eq(true));
    if let Some(category_id) = query.category_id.filter(|c| !c.is_empty()) {
        condition = condition.add(ProductCol::CategoryId.eq(category_id));
    }
    if let Some(featured) = query.featured {
        condition = condition.add(ProductCol::IsFeatured.eq(featured));
    }

    let items = Products::find()
        .filter(condition)
        .order_by_desc(ProductCol::IsFeatured)
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_product(state: &AppState, id: String) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find()
        .filter(
            Condition::all()
                .add(ProductCol::Id.eq(id.clone()))
                .add(ProductCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let packages = ProductPackages::find()
        .filter(
            Condition::all()
                .add(PackageCol::ProductId.eq(id))
                .add(PackageCol::IsAvailable.eq(true)),
        )
        .order_by_asc(PackageCol::SortOrder)
        .order_by_asc(PackageCol::PackageCode)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductPackage::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ProductDetail {
            product: Product::from(product),
            packages,
        },
        Some(Meta::empty()),
    ))
}

pub async fn product_packages(
    state: &AppState,
    product_id: String,
) -> AppResult<ApiResponse<PackageList>> {
    let product = Products::find_by_id(product_id.clone()).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let items = ProductPackages::find()
        .filter(PackageCol::ProductId.eq(product_id))
        .order_by_asc(PackageCol::SortOrder)
        .order_by_asc(PackageCol::PackageCode)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductPackage::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PackageList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_districts(state: &AppState) -> AppResult<ApiResponse<DistrictList>> {
    let items = Districts::find()
        .filter(DistrictCol::IsActive.eq(true))
        .order_by_asc(DistrictCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(District::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        DistrictList { items },
        Some(Meta::empty()),
    ))
}
