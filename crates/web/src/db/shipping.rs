//! Shipping configuration repository.

use sqlx::PgPool;

use thistle_core::{Price, ShippingMethodId, ShippingZoneId};

use super::RepositoryError;
use crate::models::{ShippingMethod, ShippingZone};

const METHOD_COLUMNS: &str =
    "sm.id, sm.zone_id, sz.name AS zone_name, sm.name, sm.price, sm.delivery_estimate, sm.active";

/// Fields for creating or updating a shipping method.
#[derive(Debug, Clone)]
pub struct ShippingMethodInput {
    pub zone_id: ShippingZoneId,
    pub name: String,
    pub price: Price,
    pub delivery_estimate: String,
    pub active: bool,
}

/// Repository for shipping zone and method operations.
pub struct ShippingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShippingRepository<'a> {
    /// Create a new shipping repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all zones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_zones(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let zones = sqlx::query_as::<_, ShippingZone>(
            "SELECT id, name, countries FROM shipping_zones ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(zones)
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_zone(
        &self,
        name: &str,
        countries: &[String],
    ) -> Result<ShippingZone, RepositoryError> {
        let zone = sqlx::query_as::<_, ShippingZone>(
            "INSERT INTO shipping_zones (name, countries)
             VALUES ($1, $2)
             RETURNING id, name, countries",
        )
        .bind(name)
        .bind(countries)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "zone name"))?;

        Ok(zone)
    }

    /// Update a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_zone(
        &self,
        id: ShippingZoneId,
        name: &str,
        countries: &[String],
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE shipping_zones SET name = $1, countries = $2 WHERE id = $3")
                .bind(name)
                .bind(countries)
                .bind(id)
                .execute(self.pool)
                .await
                .map_err(|e| RepositoryError::from_unique(e, "zone name"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a zone and its methods (methods cascade).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_zone(&self, id: ShippingZoneId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shipping_zones WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all methods with their zone names (back-office).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_methods(&self) -> Result<Vec<ShippingMethod>, RepositoryError> {
        let methods = sqlx::query_as::<_, ShippingMethod>(&format!(
            "SELECT {METHOD_COLUMNS}
             FROM shipping_methods sm
             JOIN shipping_zones sz ON sz.id = sm.zone_id
             ORDER BY sz.name, sm.price"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(methods)
    }

    /// List active methods offered at checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_methods(&self) -> Result<Vec<ShippingMethod>, RepositoryError> {
        let methods = sqlx::query_as::<_, ShippingMethod>(&format!(
            "SELECT {METHOD_COLUMNS}
             FROM shipping_methods sm
             JOIN shipping_zones sz ON sz.id = sm.zone_id
             WHERE sm.active
             ORDER BY sz.name, sm.price"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(methods)
    }

    /// Find an active method and the zone it belongs to.
    ///
    /// Checkout uses this to validate that the chosen method actually
    /// ships to the customer's country.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_active_method(
        &self,
        id: ShippingMethodId,
    ) -> Result<Option<(ShippingMethod, ShippingZone)>, RepositoryError> {
        let method = sqlx::query_as::<_, ShippingMethod>(&format!(
            "SELECT {METHOD_COLUMNS}
             FROM shipping_methods sm
             JOIN shipping_zones sz ON sz.id = sm.zone_id
             WHERE sm.id = $1 AND sm.active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(method) = method else {
            return Ok(None);
        };

        let zone = sqlx::query_as::<_, ShippingZone>(
            "SELECT id, name, countries FROM shipping_zones WHERE id = $1",
        )
        .bind(method.zone_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::DataCorruption(
            "shipping method without zone".to_owned(),
        ))?;

        Ok(Some((method, zone)))
    }

    /// Create a method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_method(
        &self,
        input: &ShippingMethodInput,
    ) -> Result<ShippingMethodId, RepositoryError> {
        let id: ShippingMethodId = sqlx::query_scalar(
            "INSERT INTO shipping_methods (zone_id, name, price, delivery_estimate, active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.zone_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.delivery_estimate)
        .bind(input.active)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Update a method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the method doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_method(
        &self,
        id: ShippingMethodId,
        input: &ShippingMethodInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shipping_methods SET
                 zone_id = $1, name = $2, price = $3, delivery_estimate = $4, active = $5
             WHERE id = $6",
        )
        .bind(input.zone_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.delivery_estimate)
        .bind(input.active)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_method(&self, id: ShippingMethodId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shipping_methods WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
