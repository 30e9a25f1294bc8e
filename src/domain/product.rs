use bigdecimal::BigDecimal;

use super::customer::DiscountCeiling;

/// A catalog entry as seen by the pricing validator.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog key.
    pub id: String,
    pub name: String,
    pub sku_code: String,
    pub price: BigDecimal,
    /// Percent; `None` means no discount is allowed.
    pub distributor_discount: Option<BigDecimal>,
    pub retailer_discount: Option<BigDecimal>,
}

impl Product {
    pub fn allowed_discount(&self, ceiling: DiscountCeiling) -> BigDecimal {
        let pct = match ceiling {
            DiscountCeiling::Distributor => self.distributor_discount.as_ref(),
            DiscountCeiling::Retailer => self.retailer_discount.as_ref(),
        };
        pct.cloned().unwrap_or_else(|| BigDecimal::from(0))
    }
}
