use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::LookupError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::Product;
use crate::schema::products;

use super::models::ProductRow;

impl From<diesel::result::Error> for LookupError {
    fn from(e: diesel::result::Error) -> Self {
        LookupError::Unavailable(e.to_string())
    }
}

impl From<r2d2::Error> for LookupError {
    fn from(e: r2d2::Error) -> Self {
        LookupError::Unavailable(e.to_string())
    }
}

/// Product catalog backed by the `products` table. The pool's connection
/// timeout bounds how long a lookup may wait on a busy database.
pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for DieselProductCatalog {
    fn lookup_by_key(&self, key: &str) -> Result<Option<Product>, LookupError> {
        let id = Uuid::parse_str(key.trim()).map_err(|_| LookupError::MalformedKey(key.to_string()))?;
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn lookup_by_sku(&self, sku: &str) -> Result<Option<Product>, LookupError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::sku_code.eq(sku))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }
}
