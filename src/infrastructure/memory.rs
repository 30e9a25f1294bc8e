use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, LookupError};
use crate::domain::order::{ListResult, NewOrder, OrderFilter, OrderUpdate, OrderView};
use crate::domain::ports::{OrderRepository, ProductCatalog};
use crate::domain::product::Product;

// ── Catalog ──────────────────────────────────────────────────────────────────

/// Catalog held in memory. Keys must be UUIDs, like the Postgres catalog.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    products: RwLock<Vec<Product>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryProductCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Number of lookups served so far, by either key or SKU.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every subsequent lookup fail as if the backing store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn find(&self, pred: impl Fn(&Product) -> bool) -> Result<Option<Product>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("catalog offline".to_string()));
        }
        let products = self
            .products
            .read()
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;
        Ok(products.iter().find(|p| pred(p)).cloned())
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn lookup_by_key(&self, key: &str) -> Result<Option<Product>, LookupError> {
        let id = Uuid::parse_str(key.trim()).map_err(|_| LookupError::MalformedKey(key.to_string()))?;
        let wanted = id.to_string();
        self.find(|p| p.id == wanted)
    }

    fn lookup_by_sku(&self, sku: &str) -> Result<Option<Product>, LookupError> {
        self.find(|p| p.sku_code == sku)
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<OrderView>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> DomainError {
    DomainError::Internal(e.to_string())
}

fn matches(filter: &OrderFilter, order: &OrderView) -> bool {
    filter
        .customer_id
        .as_ref()
        .map_or(true, |c| &order.customer_id == c)
        && filter.status.as_ref().map_or(true, |s| &order.status == s)
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let view = OrderView {
            id,
            customer_id: order.customer_id,
            customer_type: order.customer_type,
            customer_type_id: order.customer_type_id,
            customer_type_name: order.customer_type_name,
            order_items: order.items,
            subtotal: order.subtotal,
            total_amount: order.total_amount,
            order_date: order.order_date,
            order_type: order.order_type,
            status: order.status,
            notes: order.notes,
            updated_by: order.created_by.clone(),
            created_by: order.created_by,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().map_err(poisoned)?.push(view);
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.read().map_err(poisoned)?;
        // Newest first; insertion order breaks timestamp ties.
        let matching: Vec<&OrderView> = orders.iter().rev().filter(|o| matches(filter, o)).collect();
        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(ListResult {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(usize::try_from(limit).unwrap_or(0))
                .map(|o| OrderView {
                    order_items: vec![],
                    ..o.clone()
                })
                .collect(),
        })
    }

    fn update(&self, id: Uuid, update: &OrderUpdate) -> Result<bool, DomainError> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(false);
        };
        if let Some(status) = &update.status {
            order.status = status.clone();
        }
        if let Some(notes) = &update.notes {
            order.notes = notes.clone();
        }
        if let Some(updated_by) = &update.updated_by {
            order.updated_by = Some(updated_by.clone());
        }
        order.updated_at = Utc::now();
        Ok(true)
    }
}
