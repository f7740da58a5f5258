//! Seed the database with demo catalog, shipping, and blog data.
//!
//! Safe to re-run: rows that already exist (by slug or name) are skipped.

use rust_decimal::Decimal;

use thistle_core::Price;
use thistle_web::db::RepositoryError;
use thistle_web::db::categories::CategoryRepository;
use thistle_web::db::products::{ProductInput, ProductRepository};
use thistle_web::db::shipping::{ShippingMethodInput, ShippingRepository};
use thistle_web::models::slugify;

const CATEGORIES: &[&str] = &["Candles", "Ceramics", "Textiles", "Woodwork"];

const PRODUCTS: &[(&str, &str, i64, i32)] = &[
    ("Oak & Ash Candle", "Candles", 1890, 24),
    ("Juniper Pillar Candle", "Candles", 2250, 18),
    ("Stoneware Pour-Over Set", "Ceramics", 6400, 8),
    ("Speckled Breakfast Bowl", "Ceramics", 2800, 30),
    ("Wool Throw, Heather", "Textiles", 12500, 6),
    ("Linen Table Runner", "Textiles", 4300, 14),
    ("Carved Serving Board", "Woodwork", 5600, 10),
    ("Walnut Salt Cellar", "Woodwork", 3200, 16),
];

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails for
/// a reason other than the row already existing.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let categories = CategoryRepository::new(&pool);
    let mut seeded = 0_u32;

    for (position, name) in CATEGORIES.iter().enumerate() {
        let slug = slugify(name);
        match categories
            .create(name, &slug, i32::try_from(position).unwrap_or(0))
            .await
        {
            Ok(_) => seeded += 1,
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(category = name, "already seeded, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!("Categories seeded: {seeded}");

    // Re-read so products can reference categories seeded on earlier runs
    let by_name: Vec<_> = categories.list().await?;
    let products = ProductRepository::new(&pool);
    seeded = 0;

    for (name, category, cents, stock) in PRODUCTS {
        let Some(category) = by_name.iter().find(|c| c.name == *category) else {
            continue;
        };

        let input = ProductInput {
            category_id: category.id,
            name: (*name).to_owned(),
            slug: slugify(name),
            description: format!("{name}, made in small batches by our partner workshops."),
            price: Price::from_cents(*cents),
            stock_quantity: *stock,
            image_path: None,
            active: true,
        };

        match products.create(&input).await {
            Ok(_) => seeded += 1,
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(product = name, "already seeded, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!("Products seeded: {seeded}");

    seed_shipping(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_shipping(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let shipping = ShippingRepository::new(pool);

    let zones: &[(&str, &[&str])] = &[
        ("Domestic", &["GB"]),
        ("Western Europe", &["DE", "FR", "NL", "BE", "AT", "ES", "IT"]),
        ("North America", &["US", "CA"]),
    ];

    for (name, countries) in zones {
        let countries: Vec<String> = countries.iter().map(|c| (*c).to_owned()).collect();
        let zone = match shipping.create_zone(name, &countries).await {
            Ok(zone) => zone,
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(zone = name, "already seeded, skipping");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for (method, cents, estimate) in [
            ("Standard", 495_i64, "3-5 business days"),
            ("Express", 1250, "1-2 business days"),
        ] {
            shipping
                .create_method(&ShippingMethodInput {
                    zone_id: zone.id,
                    name: method.to_owned(),
                    price: Price::new(Decimal::new(cents, 2)),
                    delivery_estimate: estimate.to_owned(),
                    active: true,
                })
                .await?;
        }
    }

    tracing::info!("Shipping zones and methods seeded");
    Ok(())
}
