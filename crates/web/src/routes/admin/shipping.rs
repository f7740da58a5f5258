//! Admin shipping zone and method management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{Price, ShippingMethodId, ShippingZoneId};

use crate::db::RepositoryError;
use crate::db::shipping::{ShippingMethodInput, ShippingRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, ShippingMethod, ShippingZone};
use crate::state::AppState;

/// Zone form data. Countries arrive as a comma-separated code list.
#[derive(Debug, Deserialize)]
pub struct ZoneForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub countries: String,
}

/// Method form data.
#[derive(Debug, Deserialize)]
pub struct MethodForm {
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub zone_id: Option<ShippingZoneId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub delivery_estimate: String,
    pub active: Option<String>,
}

/// Shipping settings template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/shipping/index.html")]
pub struct ShippingTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub zones: Vec<ShippingZone>,
    pub methods: Vec<ShippingMethod>,
}

fn parse_countries(raw: &str) -> Vec<String> {
    let mut countries: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| c.len() == 2)
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

fn parse_method(form: &MethodForm) -> std::result::Result<ShippingMethodInput, String> {
    let zone_id = form.zone_id.ok_or("Zone is required")?;

    if form.name.trim().is_empty() {
        return Err("Method name is required".to_owned());
    }

    let price = form
        .price
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p >= Decimal::ZERO)
        .map(Price::new)
        .ok_or("Price must be a non-negative number")?;

    Ok(ShippingMethodInput {
        zone_id,
        name: form.name.trim().to_owned(),
        price,
        delivery_estimate: form.delivery_estimate.trim().to_owned(),
        active: form.active.is_some(),
    })
}

/// Zones and methods on one page.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<ShippingTemplate> {
    let repo = ShippingRepository::new(state.pool());
    let zones = repo.list_zones().await?;
    let methods = repo.list_methods().await?;

    Ok(ShippingTemplate {
        admin,
        flash: take_flash(&session).await,
        zones,
        methods,
    })
}

/// Create a zone.
pub async fn create_zone(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<ZoneForm>,
) -> Result<Redirect> {
    let countries = parse_countries(&form.countries);

    if form.name.trim().is_empty() || countries.is_empty() {
        set_flash(
            &session,
            Flash::error("Zone needs a name and at least one two-letter country code"),
        )
        .await?;
        return Ok(Redirect::to("/admin/shipping"));
    }

    match ShippingRepository::new(state.pool())
        .create_zone(form.name.trim(), &countries)
        .await
    {
        Ok(_) => set_flash(&session, Flash::success("Zone created")).await?,
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/shipping"))
}

/// Update a zone.
pub async fn update_zone(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<ShippingZoneId>,
    Form(form): Form<ZoneForm>,
) -> Result<Redirect> {
    let countries = parse_countries(&form.countries);

    if form.name.trim().is_empty() || countries.is_empty() {
        set_flash(
            &session,
            Flash::error("Zone needs a name and at least one two-letter country code"),
        )
        .await?;
        return Ok(Redirect::to("/admin/shipping"));
    }

    match ShippingRepository::new(state.pool())
        .update_zone(id, form.name.trim(), &countries)
        .await
    {
        Ok(()) => set_flash(&session, Flash::success("Zone updated")).await?,
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("shipping zone {id}")));
        }
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/shipping"))
}

/// Delete a zone (its methods cascade).
pub async fn delete_zone(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<ShippingZoneId>,
) -> Result<Redirect> {
    if ShippingRepository::new(state.pool()).delete_zone(id).await? {
        set_flash(&session, Flash::success("Zone deleted")).await?;
    } else {
        set_flash(&session, Flash::error("Zone not found")).await?;
    }

    Ok(Redirect::to("/admin/shipping"))
}

/// Create a method.
pub async fn create_method(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<MethodForm>,
) -> Result<Redirect> {
    match parse_method(&form) {
        Ok(input) => {
            ShippingRepository::new(state.pool())
                .create_method(&input)
                .await?;
            set_flash(&session, Flash::success("Method created")).await?;
        }
        Err(msg) => set_flash(&session, Flash::error(msg)).await?,
    }

    Ok(Redirect::to("/admin/shipping"))
}

/// Update a method.
pub async fn update_method(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<ShippingMethodId>,
    Form(form): Form<MethodForm>,
) -> Result<Redirect> {
    match parse_method(&form) {
        Ok(input) => {
            match ShippingRepository::new(state.pool())
                .update_method(id, &input)
                .await
            {
                Ok(()) => set_flash(&session, Flash::success("Method updated")).await?,
                Err(RepositoryError::NotFound) => {
                    return Err(AppError::NotFound(format!("shipping method {id}")));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(msg) => set_flash(&session, Flash::error(msg)).await?,
    }

    Ok(Redirect::to("/admin/shipping"))
}

/// Delete a method.
pub async fn delete_method(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<ShippingMethodId>,
) -> Result<Redirect> {
    if ShippingRepository::new(state.pool())
        .delete_method(id)
        .await?
    {
        set_flash(&session, Flash::success("Method deleted")).await?;
    } else {
        set_flash(&session, Flash::error("Method not found")).await?;
    }

    Ok(Redirect::to("/admin/shipping"))
}

#[cfg(test)]
mod tests {
    use super::parse_countries;

    #[test]
    fn test_parse_countries_normalizes() {
        assert_eq!(
            parse_countries("de, fr ,DE, us"),
            vec!["DE".to_owned(), "FR".to_owned(), "US".to_owned()]
        );
    }

    #[test]
    fn test_parse_countries_drops_junk() {
        assert_eq!(parse_countries("germany, d, , GB"), vec!["GB".to_owned()]);
    }
}
