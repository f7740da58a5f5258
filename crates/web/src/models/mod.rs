//! Domain models.

pub mod blog;
pub mod content;
pub mod order;
pub mod product;
pub mod shipping;
pub mod user;

pub use blog::{BlogCategory, BlogPost};
pub use content::{Certificate, GalleryItem};
pub use order::{Order, OrderItem};
pub use product::{Category, Product, slugify};
pub use shipping::{ShippingMethod, ShippingZone};
pub use user::{CurrentUser, User};

/// Session storage keys.
pub mod session_keys {
    /// The logged-in user (`CurrentUser`).
    pub const CURRENT_USER: &str = "current_user";
    /// Cart token (UUID string) identifying this session's cart rows.
    pub const CART_TOKEN: &str = "cart_token";
    /// Active UI language code.
    pub const LANGUAGE: &str = "language";
    /// One-time flash message.
    pub const FLASH: &str = "flash";
}
