//! Admin product CRUD.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{CategoryId, Price, ProductId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::{ProductInput, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CurrentUser, Product, slugify};
use crate::state::AppState;

/// Product create/update form data; redisplayed on validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock_quantity: String,
    #[serde(default)]
    pub image_path: String,
    /// Checkboxes submit "on" or nothing.
    pub active: Option<String>,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            category_id: Some(product.category_id),
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            stock_quantity: product.stock_quantity.to_string(),
            image_path: product.image_path.clone().unwrap_or_default(),
            active: product.active.then(|| "on".to_owned()),
        }
    }

    /// Validate into a repository input, collecting field errors.
    fn validate(&self) -> std::result::Result<ProductInput, Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name is required".to_owned());
        }

        let category_id = self.category_id.unwrap_or_else(|| {
            errors.push("Category is required".to_owned());
            CategoryId::new(0)
        });

        let price = match self.price.trim().parse::<Decimal>() {
            Ok(amount) if amount >= Decimal::ZERO => Price::new(amount),
            _ => {
                errors.push("Price must be a non-negative number".to_owned());
                Price::ZERO
            }
        };

        let stock_quantity = match self.stock_quantity.trim().parse::<i32>() {
            Ok(quantity) if quantity >= 0 => quantity,
            _ => {
                errors.push("Stock must be a non-negative whole number".to_owned());
                0
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let slug = if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            slugify(&self.slug)
        };

        Ok(ProductInput {
            category_id,
            name: self.name.trim().to_owned(),
            slug,
            description: self.description.trim().to_owned(),
            price,
            stock_quantity,
            image_path: Some(self.image_path.trim().to_owned()).filter(|p| !p.is_empty()),
            active: self.active.is_some(),
        })
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub products: Vec<Product>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub categories: Vec<Category>,
    pub form: ProductForm,
    pub errors: Vec<String>,
    /// `None` for create, the product id for edit.
    pub editing: Option<ProductId>,
}

/// Listing of all products, inactive included.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(ProductsIndexTemplate {
        admin,
        flash: take_flash(&session).await,
        products,
    })
}

/// Empty create form.
pub async fn new(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<ProductFormTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(ProductFormTemplate {
        admin,
        flash: None,
        categories,
        form: ProductForm {
            active: Some("on".to_owned()),
            ..ProductForm::default()
        },
        errors: Vec::new(),
        editing: None,
    })
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let categories = CategoryRepository::new(state.pool()).list().await?;
            return Ok(ProductFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors,
                editing: None,
            }
            .into_response());
        }
    };

    match ProductRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            tracing::info!(product_id = %id, "product created");
            set_flash(&session, Flash::success("Product created")).await?;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(RepositoryError::Conflict(msg)) => {
            let categories = CategoryRepository::new(state.pool()).list().await?;
            Ok(ProductFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors: vec![msg],
                editing: None,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form, pre-filled from the stored product.
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(ProductFormTemplate {
        admin,
        flash: None,
        categories,
        form: ProductForm::from_product(&product),
        errors: Vec::new(),
        editing: Some(id),
    })
}

/// Update a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let categories = CategoryRepository::new(state.pool()).list().await?;
            return Ok(ProductFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors,
                editing: Some(id),
            }
            .into_response());
        }
    };

    match ProductRepository::new(state.pool()).update(id, &input).await {
        Ok(()) => {
            set_flash(&session, Flash::success("Product updated")).await?;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("product {id}"))),
        Err(RepositoryError::Conflict(msg)) => {
            let categories = CategoryRepository::new(state.pool()).list().await?;
            Ok(ProductFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors: vec![msg],
                editing: Some(id),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a product, or explain why it cannot be deleted.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    match ProductRepository::new(state.pool()).delete(id).await {
        Ok(true) => {
            set_flash(&session, Flash::success("Product deleted")).await?;
        }
        Ok(false) => {
            set_flash(&session, Flash::error("Product not found")).await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            set_flash(
                &session,
                Flash::error("Product has orders; deactivate it instead of deleting"),
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/products"))
}
