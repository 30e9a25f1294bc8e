use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    CreatedOrder, NewOrder, OrderFilter, OrderRequest, OrderUpdate, OrderView, Pagination,
};
use crate::domain::ports::{OrderRepository, ProductCatalog};

use super::order_validator::validate_order;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

const DEFAULT_ORDER_TYPE: &str = "Primary";
const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<OrderView>,
    pub pagination: Pagination,
}

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    catalog: Arc<dyn ProductCatalog>,
}

fn trimmed_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// Verify the order's pricing and persist the server-computed version.
    pub fn create_order(&self, request: OrderRequest) -> Result<CreatedOrder, DomainError> {
        let validated = validate_order(&request, self.catalog.as_ref()).map_err(|e| {
            log::warn!(
                "order for customer {:?} rejected: {} {}",
                request.customer_id,
                e.code(),
                e
            );
            e
        })?;

        let total_amount = validated.total_amount();
        let status = trimmed_or(request.status.as_deref(), DEFAULT_STATUS);
        let new_order = NewOrder {
            customer_id: trimmed_or(request.customer_id.as_deref(), ""),
            customer_type: trimmed_or(request.customer_type.as_deref(), ""),
            customer_type_id: request
                .customer_type_id
                .as_ref()
                .and_then(|id| id.to_integer())
                .and_then(|id| i32::try_from(id).ok()),
            customer_type_name: request.customer_type_name,
            items: validated.items,
            subtotal: validated.subtotal.clone(),
            total_amount: total_amount.clone(),
            order_date: validated.order_date,
            order_type: trimmed_or(request.order_type.as_deref(), DEFAULT_ORDER_TYPE),
            status: status.clone(),
            notes: request.notes.unwrap_or_default(),
            created_by: request.created_by,
        };

        let order_id = self.repo.create(new_order).map_err(|e| {
            log::error!("failed to store order: {}", e);
            e
        })?;
        log::info!(
            "order {} created: subtotal {} ({:?})",
            order_id,
            validated.subtotal,
            validated.tier
        );

        Ok(CreatedOrder {
            order_id,
            status,
            subtotal: validated.subtotal,
            total_amount,
        })
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    /// `page` is 1-based; `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn list_orders(
        &self,
        filter: &OrderFilter,
        page: i64,
        limit: i64,
    ) -> Result<OrderPage, DomainError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let result = self.repo.list(filter, page, limit)?;
        Ok(OrderPage {
            items: result.items,
            pagination: Pagination::new(page, limit, result.total),
        })
    }

    /// Change an order's status and/or notes.
    pub fn update_order(&self, id: Uuid, update: OrderUpdate) -> Result<(), DomainError> {
        if update.status.is_none() && update.notes.is_none() {
            return Err(DomainError::InvalidInput(
                "nothing to update: provide status and/or notes".to_string(),
            ));
        }
        let status = match update.status.as_deref().map(str::trim) {
            Some("") => {
                return Err(DomainError::InvalidInput(
                    "status cannot be blank".to_string(),
                ))
            }
            other => other.map(str::to_string),
        };
        let update = OrderUpdate { status, ..update };

        if !self.repo.update(id, &update)? {
            return Err(DomainError::NotFound);
        }
        log::info!("order {} updated by {:?}", id, update.updated_by);
        Ok(())
    }
}
