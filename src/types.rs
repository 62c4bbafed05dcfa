use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::barcode::Symbology;

// ---------------------- categories ----------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub code: String,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub code: String,
    pub category: String,
    pub description: Option<String>,
    pub date_created: String,
    pub date_updated: Option<String>,
}

// ---------------------- financial quarters ----------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterRequest {
    pub year: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterResponse {
    pub id: i64,
    pub year: i64,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub date_created: String,
}

// ---------------------- products ----------------------

/// Body of `POST /products/add_products`.
///
/// `barcode` stays an untyped JSON value so a number or object is reported as an
/// empty/non-string barcode by the validator instead of a generic body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub product_code: String,
    pub product_name: String,
    pub barcode: Option<serde_json::Value>,
    pub barcode_type: Option<String>,
    pub description: String,
    pub category_id: i64,
    pub selling_price: f64,
    pub stock_count: i64,
    pub reorder_level: i64,
    pub financial_quarter_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub product_code: String,
    pub product_name: String,
    pub barcode: String,
    pub barcode_type: String,
    pub description: String,
    pub category_id: i64,
    pub selling_price: f64,
    pub stock_count: i64,
    pub reorder_level: i64,
    pub financial_quarter_id: i64,
    pub date_added: String,
    pub date_modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeCheckRequest {
    pub barcode: Option<serde_json::Value>,
    pub barcode_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeCheckResponse {
    pub valid: bool,
    pub barcode: String,
    pub barcode_type: Symbology,
    pub has_check_digit: bool,
}

// ---------------------- discounts ----------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    #[serde(rename = "Percentage")]
    Percentage,
    #[serde(rename = "Fixed Amount")]
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percentage => "Percentage",
            DiscountType::FixedAmount => "Fixed Amount",
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRequest {
    pub product_id: i64,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountResponse {
    pub id: i64,
    pub product_id: i64,
    pub discount_type: String,
    pub discount_value: f64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

// ---------------------- employees ----------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupRequest {
    pub group: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupResponse {
    pub id: i64,
    pub group: String,
    pub description: Option<String>,
    pub date_created: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub personal_email: Option<String>,
    pub company_email: String,
    pub user_group_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub personal_email: Option<String>,
    pub company_email: String,
    pub user_group_id: i64,
    pub status: String,
    pub date_created: String,
}
