//! Shipping configuration models.

use serde::Serialize;

use thistle_core::{Price, ShippingMethodId, ShippingZoneId};

/// A shipping zone: a named set of destination countries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub name: String,
    /// ISO 3166-1 alpha-2 country codes served by this zone.
    pub countries: Vec<String>,
}

impl ShippingZone {
    /// Whether this zone ships to the given country code.
    #[must_use]
    pub fn covers(&self, country_code: &str) -> bool {
        self.countries.iter().any(|c| c.eq_ignore_ascii_case(country_code))
    }
}

/// A shipping method offered within a zone.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub zone_id: ShippingZoneId,
    pub zone_name: String,
    pub name: String,
    pub price: Price,
    /// Human-readable delivery estimate (e.g., "2-4 business days").
    pub delivery_estimate: String,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use thistle_core::ShippingZoneId;

    #[test]
    fn test_zone_covers_case_insensitive() {
        let zone = ShippingZone {
            id: ShippingZoneId::new(1),
            name: "Western Europe".to_owned(),
            countries: vec!["DE".to_owned(), "FR".to_owned()],
        };
        assert!(zone.covers("de"));
        assert!(zone.covers("FR"));
        assert!(!zone.covers("US"));
    }
}
