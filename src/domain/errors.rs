use std::fmt;

use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::money::NumberLike;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Order rejected: {0}")]
    Rejected(#[from] ValidationError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("malformed catalog key '{0}'")]
    MalformedKey(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Stable, caller-visible rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ProductNotFound,
    DiscountNotAllowed,
    PriceValidationFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ProductNotFound => "PRODUCT_NOT_FOUND",
            ErrorCode::DiscountNotAllowed => "DISCOUNT_NOT_ALLOWED",
            ErrorCode::PriceValidationFailed => "PRICE_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First failure met while resolving a product reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    MalformedKey,
    CatalogUnavailable,
    NoMatch,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NotFoundReason::MalformedKey => "Invalid product_id format",
            NotFoundReason::CatalogUnavailable => "Product catalog unavailable",
            NotFoundReason::NoMatch => "Product not found by product_id or sku_code",
        };
        f.write_str(text)
    }
}

impl From<&LookupError> for NotFoundReason {
    fn from(e: &LookupError) -> Self {
        match e {
            LookupError::MalformedKey(_) => NotFoundReason::MalformedKey,
            LookupError::Unavailable(_) => NotFoundReason::CatalogUnavailable,
        }
    }
}

/// Server-computed pricing of one line, in the client's field convention
/// (`net_price` is the line total).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePricing {
    pub unit_price: BigDecimal,
    pub discount_percentage: BigDecimal,
    pub discount_amount: BigDecimal,
    pub net_price: BigDecimal,
    pub total_amount: BigDecimal,
}

/// Pricing of one line exactly as the client claimed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimedLinePricing {
    pub unit_price: Option<NumberLike>,
    pub discount_percentage: BigDecimal,
    pub discount_amount: Option<NumberLike>,
    pub net_price: Option<NumberLike>,
    pub total_amount: Option<NumberLike>,
}

/// Why an order was rejected by pricing validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{message}")]
    InvalidField { field: String, message: String },

    #[error("Product not found for order_items[{index}]")]
    ProductNotFound { index: usize, reason: NotFoundReason },

    #[error("order_items[{index}].discount_percentage exceeds allowed ({allowed}%)")]
    DiscountNotAllowed {
        index: usize,
        provided: BigDecimal,
        allowed: BigDecimal,
    },

    #[error("Price calculation mismatch for order_items[{index}]")]
    PriceMismatch {
        index: usize,
        expected: Box<LinePricing>,
        provided: Box<ClaimedLinePricing>,
    },

    #[error("subtotal mismatch")]
    SubtotalMismatch {
        expected: BigDecimal,
        provided: BigDecimal,
    },

    #[error("total_amount must equal subtotal (no extra charges supported)")]
    TotalMismatch {
        subtotal: BigDecimal,
        total_amount: BigDecimal,
    },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingField { .. }
            | ValidationError::InvalidField { .. }
            | ValidationError::SubtotalMismatch { .. }
            | ValidationError::TotalMismatch { .. } => ErrorCode::ValidationError,
            ValidationError::ProductNotFound { .. } => ErrorCode::ProductNotFound,
            ValidationError::DiscountNotAllowed { .. } => ErrorCode::DiscountNotAllowed,
            ValidationError::PriceMismatch { .. } => ErrorCode::PriceValidationFailed,
        }
    }

    /// Structured context for rendering the rejection to a caller.
    pub fn details(&self) -> Value {
        match self {
            ValidationError::MissingField { field } => json!({ "field": field }),
            ValidationError::InvalidField { field, .. } => json!({ "field": field }),
            ValidationError::ProductNotFound { index, reason } => json!({
                "index": index,
                "reason": reason,
                "message": reason.to_string(),
            }),
            ValidationError::DiscountNotAllowed {
                index,
                provided,
                allowed,
            } => json!({
                "index": index,
                "provided": provided,
                "allowed": allowed,
            }),
            ValidationError::PriceMismatch {
                index,
                expected,
                provided,
            } => json!({
                "index": index,
                "expected": expected,
                "provided": provided,
            }),
            ValidationError::SubtotalMismatch { expected, provided } => json!({
                "field": "subtotal",
                "expected": expected,
                "provided": provided,
            }),
            ValidationError::TotalMismatch {
                subtotal,
                total_amount,
            } => json!({
                "field": "total_amount",
                "subtotal": subtotal,
                "total_amount": total_amount,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy() {
        assert_eq!(
            ValidationError::missing("customer_id").code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            ValidationError::SubtotalMismatch {
                expected: BigDecimal::from(150),
                provided: BigDecimal::from(200),
            }
            .code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            ValidationError::ProductNotFound {
                index: 0,
                reason: NotFoundReason::NoMatch,
            }
            .code(),
            ErrorCode::ProductNotFound
        );
    }

    #[test]
    fn code_serializes_screaming_snake() {
        let v = serde_json::to_value(ErrorCode::PriceValidationFailed).expect("serialize");
        assert_eq!(v, json!("PRICE_VALIDATION_FAILED"));
        assert_eq!(ErrorCode::DiscountNotAllowed.to_string(), "DISCOUNT_NOT_ALLOWED");
    }

    #[test]
    fn missing_field_message_names_field() {
        let e = ValidationError::missing("order_items[2].sku_code");
        assert_eq!(e.to_string(), "order_items[2].sku_code is required");
        assert_eq!(e.details(), json!({ "field": "order_items[2].sku_code" }));
    }

    #[test]
    fn discount_details_carry_both_percentages() {
        let e = ValidationError::DiscountNotAllowed {
            index: 0,
            provided: BigDecimal::from(10),
            allowed: BigDecimal::from(5),
        };
        let d = e.details();
        assert_eq!(d["provided"], json!("10"));
        assert_eq!(d["allowed"], json!("5"));
    }

    #[test]
    fn lookup_error_maps_to_reason() {
        assert_eq!(
            NotFoundReason::from(&LookupError::MalformedKey("x".into())),
            NotFoundReason::MalformedKey
        );
        assert_eq!(
            NotFoundReason::from(&LookupError::Unavailable("timeout".into())),
            NotFoundReason::CatalogUnavailable
        );
    }
}
