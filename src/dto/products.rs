use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, District, Product, ProductPackage};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// Product detail together with its purchasable packages.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub packages: Vec<ProductPackage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PackageList {
    pub items: Vec<ProductPackage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistrictList {
    pub items: Vec<District>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoValidateRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoValidateResponse {
    pub valid: bool,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    pub is_gold_code: Option<bool>,
    pub message: String,
}
