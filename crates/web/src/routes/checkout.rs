//! Checkout route handlers.
//!
//! Checkout is the one multi-statement write in the system. Validation
//! errors are collected per field and the form is redisplayed with the
//! submitted values; a successful submission runs the transactional
//! placement in [`OrderRepository::place_order`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{Email, Price, ShippingMethodId};

use crate::db::cart::{CartLine, CartRepository, subtotal};
use crate::db::orders::{OrderRepository, PlaceOrder, PlaceOrderError};
use crate::db::shipping::ShippingRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Order, ShippingMethod};
use crate::state::AppState;

use super::cart::get_cart_token;

/// Checkout form data; redisplayed verbatim on validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub shipping_method_id: Option<ShippingMethodId>,
    #[serde(default)]
    pub notes: String,
}

/// A field-level validation error.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub lines: Vec<CartLine>,
    pub cart_subtotal: Price,
    pub methods: Vec<ShippingMethod>,
    pub countries: Vec<String>,
    pub form: CheckoutForm,
    pub errors: Vec<FieldError>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub order: Order,
}

/// Load everything the checkout form needs besides the form itself.
async fn load_checkout_page(
    state: &AppState,
    session: &Session,
) -> Result<(Vec<CartLine>, Vec<ShippingMethod>, Vec<String>)> {
    let lines = match get_cart_token(session).await {
        Some(token) => CartRepository::new(state.pool()).lines(token).await?,
        None => Vec::new(),
    };

    let shipping = ShippingRepository::new(state.pool());
    let methods = shipping.list_active_methods().await?;

    let mut countries: Vec<String> = shipping
        .list_zones()
        .await?
        .into_iter()
        .flat_map(|zone| zone.countries)
        .collect();
    countries.sort();
    countries.dedup();

    Ok((lines, methods, countries))
}

/// Display the checkout form; an empty cart bounces back to the cart page.
pub async fn show(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let (lines, methods, countries) = load_checkout_page(&state, &session).await?;

    if lines.is_empty() {
        set_flash(&session, Flash::info(locale.t("flash.cart_empty"))).await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut form = CheckoutForm::default();
    if let Some(ref u) = user {
        form.name.clone_from(&u.name);
        form.email = u.email.as_str().to_owned();
    }

    let cart_subtotal = subtotal(&lines);
    Ok(CheckoutTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        lines,
        cart_subtotal,
        methods,
        countries,
        form,
        errors: Vec::new(),
    }
    .into_response())
}

/// Validate the submitted form, resolving the chosen shipping method.
async fn validate(
    state: &AppState,
    locale: &Locale,
    form: &CheckoutForm,
) -> Result<std::result::Result<(ShippingMethod, Price), Vec<FieldError>>> {
    let mut errors = Vec::new();
    let required = |field: &'static str, value: &str, errors: &mut Vec<FieldError>| {
        if value.trim().is_empty() {
            errors.push(FieldError {
                field,
                message: locale.t("checkout.errors.required"),
            });
        }
    };

    required("name", &form.name, &mut errors);
    required("address", &form.address, &mut errors);
    required("city", &form.city, &mut errors);
    required("postal_code", &form.postal_code, &mut errors);
    required("country", &form.country, &mut errors);

    if Email::parse(&form.email).is_err() {
        errors.push(FieldError {
            field: "email",
            message: locale.t("checkout.errors.invalid_email"),
        });
    }

    let method = match form.shipping_method_id {
        Some(id) => ShippingRepository::new(state.pool())
            .find_active_method(id)
            .await?,
        None => None,
    };

    let method = match method {
        Some((method, zone)) => {
            if zone.covers(form.country.trim()) {
                Some(method)
            } else {
                errors.push(FieldError {
                    field: "shipping_method_id",
                    message: locale.t("checkout.errors.method_not_available"),
                });
                None
            }
        }
        None => {
            errors.push(FieldError {
                field: "shipping_method_id",
                message: locale.t("checkout.errors.method_required"),
            });
            None
        }
    };

    match (method, errors.is_empty()) {
        (Some(method), true) => {
            let price = method.price;
            Ok(Ok((method, price)))
        }
        _ => Ok(Err(errors)),
    }
}

/// Handle checkout submission.
pub async fn place_order(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(token) = get_cart_token(&session).await else {
        set_flash(&session, Flash::info(locale.t("flash.cart_empty"))).await?;
        return Ok(Redirect::to("/cart").into_response());
    };

    let (method, shipping_price) = match validate(&state, &locale, &form).await? {
        Ok(resolved) => resolved,
        Err(errors) => {
            let (lines, methods, countries) = load_checkout_page(&state, &session).await?;
            let cart_subtotal = subtotal(&lines);
            return Ok(CheckoutTemplate {
                locale,
                user,
                flash: None,
                lines,
                cart_subtotal,
                methods,
                countries,
                form,
                errors,
            }
            .into_response());
        }
    };

    let details = PlaceOrder {
        user_id: user.as_ref().map(|u| u.id),
        customer_name: form.name.trim().to_owned(),
        customer_email: form.email.trim().to_owned(),
        customer_phone: Some(form.phone.trim().to_owned()).filter(|p| !p.is_empty()),
        shipping_address: form.address.trim().to_owned(),
        shipping_city: form.city.trim().to_owned(),
        shipping_postal_code: form.postal_code.trim().to_owned(),
        shipping_country: form.country.trim().to_uppercase(),
        shipping_method_name: method.name.clone(),
        shipping_price,
        notes: Some(form.notes.trim().to_owned()).filter(|n| !n.is_empty()),
    };

    match OrderRepository::new(state.pool())
        .place_order(token, &details)
        .await
    {
        Ok(order) => {
            tracing::info!(order_number = %order.order_number, "order placed");
            set_flash(&session, Flash::success(locale.t("flash.order_placed"))).await?;
            Ok(Redirect::to(&format!("/checkout/complete/{}", order.order_number)).into_response())
        }
        Err(PlaceOrderError::EmptyCart) => {
            set_flash(&session, Flash::info(locale.t("flash.cart_empty"))).await?;
            Ok(Redirect::to("/cart").into_response())
        }
        Err(PlaceOrderError::InsufficientStock(product)) => {
            // The whole placement rolled back; the cart is untouched
            set_flash(
                &session,
                Flash::error(format!("{}: {product}", locale.t("flash.out_of_stock"))),
            )
            .await?;
            Ok(Redirect::to("/cart").into_response())
        }
        Err(PlaceOrderError::Repository(e)) => Err(AppError::Database(e)),
    }
}

/// Order confirmation page.
pub async fn complete(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(number): Path<String>,
) -> Result<CheckoutCompleteTemplate> {
    let order = OrderRepository::new(state.pool())
        .find_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {number}")))?;

    Ok(CheckoutCompleteTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        order,
    })
}
