use serde::Serialize;

use super::money::NumberLike;

/// Pricing tier of the ordering customer.
///
/// The numeric `customer_type_id` sent by clients maps onto a tier through
/// [`CustomerTier::from_type_id`]; the tier then decides which of the
/// product's discount ceilings applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Distributor,
    Retailer,
    Dealer,
    Other,
}

/// Which ceiling column of a product bounds the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountCeiling {
    Distributor,
    Retailer,
}

const TIER_TABLE: &[(i64, CustomerTier)] = &[
    (1, CustomerTier::Distributor),
    (2, CustomerTier::Retailer),
    (3, CustomerTier::Dealer),
];

impl CustomerTier {
    pub fn from_type_id(id: i64) -> Self {
        TIER_TABLE
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, tier)| *tier)
            .unwrap_or(CustomerTier::Other)
    }

    /// Missing or non-integral ids resolve as id 0.
    pub fn from_claimed_id(id: Option<&NumberLike>) -> Self {
        let id = id.and_then(NumberLike::to_integer).unwrap_or(0);
        Self::from_type_id(id)
    }

    pub fn discount_ceiling(self) -> DiscountCeiling {
        match self {
            CustomerTier::Distributor => DiscountCeiling::Distributor,
            CustomerTier::Retailer | CustomerTier::Dealer | CustomerTier::Other => {
                DiscountCeiling::Retailer
            }
        }
    }
}
