//! Line-item validation and pricing arithmetic.

use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Categories a staff user may assign to a line item.
pub const LINE_ITEM_CATEGORIES: &[&str] = &[
    "labor",
    "materials",
    "paint",
    "equipment",
    "additional",
    "upgrade",
];

/// Categories a customer may add through the public gateway.
///
/// Customers can request extras against their own quote but cannot touch
/// labor or equipment pricing.
pub const CUSTOMER_CATEGORIES: &[&str] = &["additional", "upgrade"];

/// Maximum discount, in percent.
pub const MAX_DISCOUNT_PERCENT: Decimal = Decimal::ONE_HUNDRED;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a staff-supplied line-item category.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if LINE_ITEM_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "unknown line item category '{category}'"
        )))
    }
}

/// Validate a customer-supplied line-item category.
///
/// Checked after [`validate_category`] semantics: an unknown category and a
/// known-but-staff-only category both fail, with distinct messages.
pub fn validate_customer_category(category: &str) -> Result<(), CoreError> {
    validate_category(category)?;
    if CUSTOMER_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "category '{category}' cannot be added by the customer"
        )))
    }
}

/// Validate quantity, unit price, and discount for a line item.
pub fn validate_pricing(
    quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Decimal,
) -> Result<(), CoreError> {
    if quantity <= Decimal::ZERO {
        return Err(CoreError::Validation("quantity must be positive".into()));
    }
    if unit_price < Decimal::ZERO {
        return Err(CoreError::Validation(
            "unit_price must not be negative".into(),
        ));
    }
    if discount_percent < Decimal::ZERO || discount_percent > MAX_DISCOUNT_PERCENT {
        return Err(CoreError::Validation(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Compute the stored total for a line item.
///
/// `quantity * unit_price * (1 - discount/100)`, rounded to cents.
pub fn line_item_total(
    quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Decimal,
) -> Decimal {
    let gross = quantity * unit_price;
    let factor = (Decimal::ONE_HUNDRED - discount_percent) / Decimal::ONE_HUNDRED;
    (gross * factor).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // -- categories ----------------------------------------------------------

    #[test]
    fn staff_categories_validate() {
        for cat in LINE_ITEM_CATEGORIES {
            assert!(validate_category(cat).is_ok());
        }
        assert!(validate_category("plumbing").is_err());
    }

    #[test]
    fn customer_may_only_add_customer_categories() {
        assert!(validate_customer_category("additional").is_ok());
        assert!(validate_customer_category("upgrade").is_ok());
        assert!(validate_customer_category("labor").is_err());
        assert!(validate_customer_category("paint").is_err());
        assert!(validate_customer_category("nonsense").is_err());
    }

    // -- pricing validation --------------------------------------------------

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        assert!(validate_pricing(dec!(0), dec!(10), dec!(0)).is_err());
        assert!(validate_pricing(dec!(-1), dec!(10), dec!(0)).is_err());
        assert!(validate_pricing(dec!(0.5), dec!(10), dec!(0)).is_ok());
    }

    #[test]
    fn discount_outside_0_to_100_is_rejected() {
        assert!(validate_pricing(dec!(1), dec!(10), dec!(-1)).is_err());
        assert!(validate_pricing(dec!(1), dec!(10), dec!(101)).is_err());
        assert!(validate_pricing(dec!(1), dec!(10), dec!(100)).is_ok());
    }

    // -- totals --------------------------------------------------------------

    #[test]
    fn total_without_discount_is_qty_times_price() {
        assert_eq!(line_item_total(dec!(3), dec!(25.50), dec!(0)), dec!(76.50));
    }

    #[test]
    fn total_applies_percentage_discount() {
        assert_eq!(line_item_total(dec!(2), dec!(100), dec!(15)), dec!(170.00));
    }

    #[test]
    fn total_rounds_to_cents() {
        // 3 * 9.99 * 0.90 = 26.9730
        assert_eq!(line_item_total(dec!(3), dec!(9.99), dec!(10)), dec!(26.97));
    }

    #[test]
    fn full_discount_yields_zero() {
        assert_eq!(line_item_total(dec!(4), dec!(50), dec!(100)), dec!(0.00));
    }
}
