//! Custom Askama template filters.

use std::fmt::Display;

/// Format a price for display with the store currency symbol.
///
/// Usage in templates: `{{ product.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${value}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use thistle_core::Price;

    #[test]
    fn test_money_formats_price() {
        let price = Price::from_cents(1990);
        assert_eq!(format!("${price}"), "$19.90");
    }
}
