use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::customer::CustomerTier;
use super::money::NumberLike;

// ── Untrusted input ──────────────────────────────────────────────────────────

/// One line of an order as submitted by a client.
///
/// The pricing fields are claims to be checked, never stored. By client
/// convention `discount_amount` is the discount for the whole line and
/// `net_price` is the line total, not a per-unit price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLineItemRequest {
    pub product_id: Option<String>,
    pub sku_code: Option<String>,
    /// Overrides the catalog name on the stored line when non-empty.
    pub product_name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<NumberLike>,
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<NumberLike>,
    /// Defaults to 0 when absent.
    #[schema(value_type = Option<f64>)]
    pub discount_percentage: Option<NumberLike>,
    #[schema(value_type = Option<f64>)]
    pub discount_amount: Option<NumberLike>,
    #[schema(value_type = Option<f64>)]
    pub net_price: Option<NumberLike>,
    #[schema(value_type = Option<f64>)]
    pub total_amount: Option<NumberLike>,
}

/// An order as submitted by a client. Every field is optional at the type
/// level so that a missing field surfaces as a named validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_id: Option<String>,
    pub customer_type: Option<String>,
    /// 1 = distributor, 2 = retailer, 3 = dealer.
    #[schema(value_type = Option<i64>)]
    pub customer_type_id: Option<NumberLike>,
    pub customer_type_name: Option<String>,
    pub order_items: Option<Vec<OrderLineItemRequest>>,
    #[schema(value_type = Option<f64>)]
    pub subtotal: Option<NumberLike>,
    #[schema(value_type = Option<f64>)]
    pub total_amount: Option<NumberLike>,
    /// `YYYY-MM-DD`
    pub order_date: Option<String>,
    pub order_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

// ── Server-verified output ───────────────────────────────────────────────────

/// A line after pricing verification. Every monetary value is the server's
/// own computation rounded to two places; `net_price` is per unit.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderLineItemRecord {
    pub product_id: String,
    pub product_name: String,
    pub sku_code: String,
    #[schema(value_type = String)]
    pub quantity: BigDecimal,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    #[schema(value_type = String)]
    pub discount_percentage: BigDecimal,
    /// Discount for the whole line.
    #[schema(value_type = String)]
    pub discount_amount: BigDecimal,
    /// Net price per unit.
    #[schema(value_type = String)]
    pub net_price: BigDecimal,
    /// Line total.
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
}

impl OrderLineItemRecord {
    /// Express this record as a client line, mapping the stored per-unit
    /// `net_price` back to the client's line-total convention.
    pub fn to_request(&self) -> OrderLineItemRequest {
        OrderLineItemRequest {
            product_id: Some(self.product_id.clone()),
            sku_code: Some(self.sku_code.clone()),
            product_name: Some(self.product_name.clone()),
            quantity: Some(NumberLike::from(&self.quantity)),
            unit_price: Some(NumberLike::from(&self.unit_price)),
            discount_percentage: Some(NumberLike::from(&self.discount_percentage)),
            discount_amount: Some(NumberLike::from(&self.discount_amount)),
            net_price: Some(NumberLike::from(&self.total_amount)),
            total_amount: Some(NumberLike::from(&self.total_amount)),
        }
    }
}

/// Result of a successful pricing validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub items: Vec<OrderLineItemRecord>,
    pub subtotal: BigDecimal,
    pub order_date: NaiveDate,
    pub tier: CustomerTier,
}

impl ValidatedOrder {
    /// No tax or shipping is modelled, so the total is the subtotal.
    pub fn total_amount(&self) -> BigDecimal {
        self.subtotal.clone()
    }
}

// ── Persistence shapes ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub customer_type: String,
    pub customer_type_id: Option<i32>,
    pub customer_type_name: Option<String>,
    pub items: Vec<OrderLineItemRecord>,
    pub subtotal: BigDecimal,
    pub total_amount: BigDecimal,
    pub order_date: NaiveDate,
    pub order_type: String,
    pub status: String,
    pub notes: String,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: String,
    pub customer_type: String,
    pub customer_type_id: Option<i32>,
    pub customer_type_name: Option<String>,
    pub order_items: Vec<OrderLineItemRecord>,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub order_date: NaiveDate,
    pub order_type: String,
    pub status: String,
    pub notes: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreatedOrder {
    pub order_id: Uuid,
    pub status: String,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
}

/// Fields a client may change after creation. Pricing is deliberately
/// absent: it can only be set through validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderUpdate {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub limit: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_count: i64) -> Self {
        let total_pages = (total_count + limit - 1) / limit;
        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}
