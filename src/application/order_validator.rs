//! Server-side verification of client-priced orders.
//!
//! Every monetary figure on an incoming order is recomputed from the catalog
//! and compared against what the client claimed. The order is accepted only
//! when all claims agree within tolerance; the first disagreement rejects
//! the whole order.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::domain::customer::{CustomerTier, DiscountCeiling};
use crate::domain::errors::{ClaimedLinePricing, LinePricing, NotFoundReason, ValidationError};
use crate::domain::money::{
    differs_by_more_than, exceeds_money_range, money_tolerance, percentage_tolerance, round_money,
    NumberLike,
};
use crate::domain::order::{OrderLineItemRecord, OrderLineItemRequest, OrderRequest, ValidatedOrder};
use crate::domain::ports::ProductCatalog;
use crate::domain::product::Product;

const ORDER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate `order` against `catalog` and return the normalized,
/// server-priced order.
pub fn validate_order(
    order: &OrderRequest,
    catalog: &dyn ProductCatalog,
) -> Result<ValidatedOrder, ValidationError> {
    check_required_fields(order)?;

    let items = match &order.order_items {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(ValidationError::invalid(
                "order_items",
                "order_items must be a non-empty list",
            ))
        }
    };

    let order_date = order
        .order_date
        .as_deref()
        .and_then(parse_order_date)
        .ok_or_else(|| ValidationError::invalid("order_date", "order_date must be YYYY-MM-DD"))?;

    let tier = CustomerTier::from_claimed_id(order.customer_type_id.as_ref());
    let ceiling = tier.discount_ceiling();
    let mut resolver = ProductResolver::new(catalog);

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        records.push(price_line(index, item, ceiling, &mut resolver)?);
    }

    let subtotal = check_totals(order, &records)?;

    log::debug!(
        "order for customer {:?} verified: {} line(s), subtotal {}",
        order.customer_id,
        records.len(),
        subtotal
    );

    Ok(ValidatedOrder {
        items: records,
        subtotal,
        order_date,
        tier,
    })
}

fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ORDER_DATE_FORMAT).ok()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn is_blank_number(value: Option<&NumberLike>) -> bool {
    value.map_or(true, NumberLike::is_blank)
}

fn check_required_fields(order: &OrderRequest) -> Result<(), ValidationError> {
    let missing = [
        ("customer_id", is_blank(order.customer_id.as_deref())),
        ("customer_type", is_blank(order.customer_type.as_deref())),
        ("order_items", order.order_items.is_none()),
        ("subtotal", is_blank_number(order.subtotal.as_ref())),
        ("total_amount", is_blank_number(order.total_amount.as_ref())),
        ("order_date", is_blank(order.order_date.as_deref())),
        ("order_type", is_blank(order.order_type.as_deref())),
        ("status", is_blank(order.status.as_deref())),
    ];
    match missing.iter().find(|(_, absent)| *absent) {
        Some((field, _)) => Err(ValidationError::missing(*field)),
        None => Ok(()),
    }
}

// ── Product resolution ───────────────────────────────────────────────────────

/// Resolves line references against the catalog, at most once per distinct
/// (product_id, sku_code) pair within one validation.
struct ProductResolver<'a> {
    catalog: &'a dyn ProductCatalog,
    resolved: HashMap<(String, String), Product>,
}

impl<'a> ProductResolver<'a> {
    fn new(catalog: &'a dyn ProductCatalog) -> Self {
        Self {
            catalog,
            resolved: HashMap::new(),
        }
    }

    fn resolve(&mut self, product_id: &str, sku: &str) -> Result<Product, NotFoundReason> {
        let key = (product_id.to_string(), sku.to_string());
        if let Some(product) = self.resolved.get(&key) {
            return Ok(product.clone());
        }
        let product = self.lookup(product_id, sku)?;
        self.resolved.insert(key, product.clone());
        Ok(product)
    }

    /// Key first, SKU as fallback. The first failure seen is the one reported.
    fn lookup(&self, product_id: &str, sku: &str) -> Result<Product, NotFoundReason> {
        let mut first_failure = None;
        match self.catalog.lookup_by_key(product_id) {
            Ok(Some(product)) => return Ok(product),
            Ok(None) => {}
            Err(e) => {
                log::debug!("lookup by key '{}' failed: {}", product_id, e);
                first_failure = Some(NotFoundReason::from(&e));
            }
        }
        match self.catalog.lookup_by_sku(sku) {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(first_failure.unwrap_or(NotFoundReason::NoMatch)),
            Err(e) => {
                log::debug!("lookup by sku '{}' failed: {}", sku, e);
                Err(first_failure.unwrap_or_else(|| NotFoundReason::from(&e)))
            }
        }
    }
}

// ── Line pricing ─────────────────────────────────────────────────────────────

fn item_field(index: usize, name: &str) -> String {
    format!("order_items[{index}].{name}")
}

fn parse_quantity(index: usize, item: &OrderLineItemRequest) -> Result<BigDecimal, ValidationError> {
    let field = item_field(index, "quantity");
    let quantity = item
        .quantity
        .as_ref()
        .and_then(NumberLike::to_decimal)
        .ok_or_else(|| ValidationError::invalid(&field, format!("{field} must be a number")))?;
    if quantity <= BigDecimal::from(0) {
        return Err(ValidationError::invalid(&field, format!("{field} must be > 0")));
    }
    Ok(quantity)
}

fn parse_discount_percentage(
    index: usize,
    item: &OrderLineItemRequest,
) -> Result<BigDecimal, ValidationError> {
    let field = item_field(index, "discount_percentage");
    let pct = match &item.discount_percentage {
        None => BigDecimal::from(0),
        Some(raw) if raw.is_blank() => BigDecimal::from(0),
        Some(raw) => raw
            .to_decimal()
            .ok_or_else(|| ValidationError::invalid(&field, format!("{field} must be a number")))?,
    };
    if pct < BigDecimal::from(0) {
        return Err(ValidationError::invalid(
            &field,
            format!("{field} cannot be negative"),
        ));
    }
    Ok(pct)
}

/// Absent claims assert nothing; present but non-numeric claims never agree.
fn claim_disagrees(claim: Option<&NumberLike>, expected: &BigDecimal) -> bool {
    match claim {
        None => false,
        Some(raw) => match raw.to_decimal() {
            Some(value) => differs_by_more_than(&value, expected, &money_tolerance()),
            None => true,
        },
    }
}

fn price_line(
    index: usize,
    item: &OrderLineItemRequest,
    ceiling: DiscountCeiling,
    resolver: &mut ProductResolver<'_>,
) -> Result<OrderLineItemRecord, ValidationError> {
    let product_id = item
        .product_id
        .as_deref()
        .ok_or_else(|| ValidationError::missing(item_field(index, "product_id")))?;
    let sku = item
        .sku_code
        .as_deref()
        .ok_or_else(|| ValidationError::missing(item_field(index, "sku_code")))?;
    if item.quantity.is_none() {
        return Err(ValidationError::missing(item_field(index, "quantity")));
    }
    let quantity = parse_quantity(index, item)?;

    let product = resolver
        .resolve(product_id, sku)
        .map_err(|reason| ValidationError::ProductNotFound { index, reason })?;

    let allowed = product.allowed_discount(ceiling);
    let pct = parse_discount_percentage(index, item)?;
    if &pct - &allowed > percentage_tolerance() {
        return Err(ValidationError::DiscountNotAllowed {
            index,
            provided: pct,
            allowed,
        });
    }

    let hundredth = BigDecimal::new(1.into(), 2);
    let unit_price = product.price.clone();
    let discount_per_unit = &unit_price * &pct * &hundredth;
    let net_per_unit = &unit_price - &discount_per_unit;
    let total_discount = &discount_per_unit * &quantity;
    let line_total = &net_per_unit * &quantity;

    let unit_price = round_money(&unit_price);
    let net_per_unit = round_money(&net_per_unit);
    let total_discount = round_money(&total_discount);
    let line_total = round_money(&line_total);

    if exceeds_money_range(&total_discount) || exceeds_money_range(&line_total) {
        let field = item_field(index, "quantity");
        return Err(ValidationError::invalid(
            &field,
            format!("order_items[{index}] amount exceeds the largest storable value"),
        ));
    }

    // The client's net_price carries the line total.
    let claims = [
        (item.unit_price.as_ref(), &unit_price),
        (item.discount_amount.as_ref(), &total_discount),
        (item.net_price.as_ref(), &line_total),
        (item.total_amount.as_ref(), &line_total),
    ];
    if claims
        .iter()
        .any(|(claim, expected)| claim_disagrees(*claim, expected))
    {
        return Err(ValidationError::PriceMismatch {
            index,
            expected: Box::new(LinePricing {
                unit_price,
                discount_percentage: pct.clone(),
                discount_amount: total_discount,
                net_price: line_total.clone(),
                total_amount: line_total,
            }),
            provided: Box::new(ClaimedLinePricing {
                unit_price: item.unit_price.clone(),
                discount_percentage: pct,
                discount_amount: item.discount_amount.clone(),
                net_price: item.net_price.clone(),
                total_amount: item.total_amount.clone(),
            }),
        });
    }

    let product_name = item
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or(product.name);

    Ok(OrderLineItemRecord {
        product_id: product.id,
        product_name,
        sku_code: product.sku_code,
        quantity,
        unit_price,
        discount_percentage: pct,
        discount_amount: total_discount,
        net_price: net_per_unit,
        total_amount: line_total,
    })
}

// ── Order totals ─────────────────────────────────────────────────────────────

fn claimed_total(field: &str, value: Option<&NumberLike>) -> Result<BigDecimal, ValidationError> {
    value
        .and_then(NumberLike::to_decimal)
        .ok_or_else(|| ValidationError::invalid(field, "subtotal and total_amount must be numbers"))
}

fn check_totals(
    order: &OrderRequest,
    records: &[OrderLineItemRecord],
) -> Result<BigDecimal, ValidationError> {
    let provided_subtotal = claimed_total("subtotal", order.subtotal.as_ref())?;
    let provided_total = claimed_total("total_amount", order.total_amount.as_ref())?;

    let computed = round_money(
        &records
            .iter()
            .fold(BigDecimal::from(0), |acc, r| acc + &r.total_amount),
    );

    if exceeds_money_range(&computed) {
        return Err(ValidationError::invalid(
            "subtotal",
            "subtotal exceeds the largest storable value",
        ));
    }

    let tolerance = money_tolerance();
    if differs_by_more_than(&computed, &provided_subtotal, &tolerance) {
        return Err(ValidationError::SubtotalMismatch {
            expected: computed,
            provided: provided_subtotal,
        });
    }
    if differs_by_more_than(&provided_total, &provided_subtotal, &tolerance) {
        return Err(ValidationError::TotalMismatch {
            subtotal: provided_subtotal,
            total_amount: provided_total,
        });
    }
    Ok(computed)
}
