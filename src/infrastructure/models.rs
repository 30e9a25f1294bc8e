use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::order::{OrderLineItemRecord, OrderView};
use crate::domain::product::Product;
use crate::schema::{order_lines, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub sku_code: String,
    pub price: BigDecimal,
    pub distributor_discount: Option<BigDecimal>,
    pub retailer_discount: Option<BigDecimal>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id.to_string(),
            name: row.name,
            sku_code: row.sku_code,
            price: row.price,
            distributor_discount: row.distributor_discount,
            retailer_discount: row.retailer_discount,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: String,
    pub customer_type: String,
    pub customer_type_id: Option<i32>,
    pub customer_type_name: Option<String>,
    pub subtotal: BigDecimal,
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

impl OrderRow {
    pub fn into_view(self, lines: Vec<OrderLineRow>) -> OrderView {
        OrderView {
            id: self.id,
            customer_id: self.customer_id,
            customer_type: self.customer_type,
            customer_type_id: self.customer_type_id,
            customer_type_name: self.customer_type_name,
            order_items: lines.into_iter().map(OrderLineItemRecord::from).collect(),
            subtotal: self.subtotal,
            total_amount: self.total_amount,
            order_date: self.order_date,
            order_type: self.order_type,
            status: self.status,
            notes: self.notes,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: String,
    pub customer_type: String,
    pub customer_type_id: Option<i32>,
    pub customer_type_name: Option<String>,
    pub subtotal: BigDecimal,
    pub total_amount: BigDecimal,
    pub order_date: NaiveDate,
    pub order_type: String,
    pub status: String,
    pub notes: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub line_no: i32,
    pub product_id: String,
    pub product_name: String,
    pub sku_code: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub discount_percentage: BigDecimal,
    pub discount_amount: BigDecimal,
    pub net_price: BigDecimal,
    pub total_amount: BigDecimal,
}

impl From<OrderLineRow> for OrderLineItemRecord {
    fn from(row: OrderLineRow) -> Self {
        OrderLineItemRecord {
            product_id: row.product_id,
            product_name: row.product_name,
            sku_code: row.sku_code,
            quantity: row.quantity,
            unit_price: row.unit_price,
            discount_percentage: row.discount_percentage,
            discount_amount: row.discount_amount,
            net_price: row.net_price,
            total_amount: row.total_amount,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub line_no: i32,
    pub product_id: String,
    pub product_name: String,
    pub sku_code: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub discount_percentage: BigDecimal,
    pub discount_amount: BigDecimal,
    pub net_price: BigDecimal,
    pub total_amount: BigDecimal,
}

impl NewOrderLineRow {
    pub fn from_record(order_id: Uuid, line_no: i32, record: &OrderLineItemRecord) -> Self {
        NewOrderLineRow {
            id: Uuid::new_v4(),
            order_id,
            line_no,
            product_id: record.product_id.clone(),
            product_name: record.product_name.clone(),
            sku_code: record.sku_code.clone(),
            quantity: record.quantity.clone(),
            unit_price: record.unit_price.clone(),
            discount_percentage: record.discount_percentage.clone(),
            discount_amount: record.discount_amount.clone(),
            net_price: record.net_price.clone(),
            total_amount: record.total_amount.clone(),
        }
    }
}
