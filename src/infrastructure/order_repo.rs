use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, OrderFilter, OrderUpdate, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders};

use super::models::{NewOrderLineRow, NewOrderRow, OrderChangeset, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered<'a>(filter: &'a OrderFilter) -> orders::BoxedQuery<'a, diesel::pg::Pg> {
    let mut query = orders::table.into_boxed();
    if let Some(customer_id) = &filter.customer_id {
        query = query.filter(orders::customer_id.eq(customer_id));
    }
    if let Some(status) = &filter.status {
        query = query.filter(orders::status.eq(status));
    }
    query
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id: order.customer_id,
                    customer_type: order.customer_type,
                    customer_type_id: order.customer_type_id,
                    customer_type_name: order.customer_type_name,
                    subtotal: order.subtotal,
                    total_amount: order.total_amount,
                    order_date: order.order_date,
                    order_type: order.order_type,
                    status: order.status,
                    notes: order.notes,
                    updated_by: order.created_by.clone(),
                    created_by: order.created_by,
                })
                .execute(conn)?;

            // 2. Insert the verified lines, keeping their submitted order
            let new_lines = order
                .items
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let line_no = i32::try_from(i)
                        .map_err(|_| DomainError::InvalidInput("too many order lines".to_string()))?;
                    Ok(NewOrderLineRow::from_record(order_id, line_no, record))
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::line_no.asc())
            .load(&mut conn)?;

        Ok(Some(order.into_view(lines)))
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(filter).count().get_result(conn)?;

            let rows = filtered(filter)
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows.into_iter().map(|o| o.into_view(vec![])).collect(),
                total,
            })
        })
    }

    fn update(&self, id: Uuid, update: &OrderUpdate) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let changed = diesel::update(orders::table.find(id))
            .set(&OrderChangeset {
                status: update.status.clone(),
                notes: update.notes.clone(),
                updated_by: update.updated_by.clone(),
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;
        Ok(changed > 0)
    }
}
