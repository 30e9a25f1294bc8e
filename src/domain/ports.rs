use uuid::Uuid;

use super::errors::{DomainError, LookupError};
use super::order::{ListResult, NewOrder, OrderFilter, OrderUpdate, OrderView};
use super::product::Product;

/// Read-only access to the product catalog.
pub trait ProductCatalog: Send + Sync + 'static {
    fn lookup_by_key(&self, key: &str) -> Result<Option<Product>, LookupError>;
    fn lookup_by_sku(&self, sku: &str) -> Result<Option<Product>, LookupError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    /// Returns `false` when no order has the given id.
    fn update(&self, id: Uuid, update: &OrderUpdate) -> Result<bool, DomainError>;
}
