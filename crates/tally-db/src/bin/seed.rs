//! # Seed Data Generator
//!
//! Populates the database with test products and coupons for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full demo catalog (default)
//! cargo run -p tally-db --bin seed
//!
//! # Generate a custom amount
//! cargo run -p tally-db --bin seed -- --count 40
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! ## Generated Data
//! Products across a small merch catalog:
//! - Drinkware (mugs, bottles)
//! - Apparel (tees, hoodies)
//! - Stationery (notebooks, stickers)
//! - Digital (gift cards, no inventory tracking)
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Deterministic price from the catalog table plus a variant addon
//! - Stock for tracked categories
//!
//! Coupons cover every validity shape: always-on, expired, and not yet
//! started, in both percentage and fixed kinds.

use chrono::{Duration, Utc};
use std::env;
use tally_core::{Coupon, Product};
use tally_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Catalog categories: (code, [(name, base price in cents)]).
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "CUP",
        &[
            ("Classic Mug", 1200),
            ("Travel Mug", 1900),
            ("Espresso Cup", 900),
            ("Water Bottle", 2200),
            ("Tumbler", 1700),
        ],
    ),
    (
        "APP",
        &[
            ("Logo Tee", 2400),
            ("Pocket Tee", 2600),
            ("Zip Hoodie", 5400),
            ("Beanie", 1800),
            ("Cap", 2100),
        ],
    ),
    (
        "STA",
        &[
            ("Dot Grid Notebook", 1400),
            ("Sticker Pack", 550),
            ("Gel Pen Set", 1050),
            ("Desk Pad", 2800),
            ("Enamel Pin", 800),
        ],
    ),
    (
        "DIG",
        &[
            ("Gift Card 10", 1000),
            ("Gift Card 25", 2500),
            ("Gift Card 50", 5000),
        ],
    ),
];

/// Size/variant addons in cents.
const VARIANTS: &[(&str, i64)] = &[("Standard", 0), ("Large", 200), ("XL", 400)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 45;
    let mut db_path = String::from("./tally_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(45);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 45)");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database (runs migrations)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (category_idx, (category_code, items)) in CATALOG.iter().enumerate() {
        for (item_idx, (item_name, base_price)) in items.iter().enumerate() {
            for (variant_idx, (variant_name, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break;
                }

                let product = generate_product(
                    category_code,
                    item_name,
                    variant_name,
                    base_price + price_addon,
                    category_idx * 100 + item_idx * 10 + variant_idx,
                );

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.sku, e);
                    continue;
                }

                generated += 1;
            }

            if generated >= count {
                break;
            }
        }

        if generated >= count {
            break;
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Coupons: one of each validity shape
    println!();
    println!("Generating coupons...");

    let now = Utc::now();

    let coupons = vec![
        // Always-on 10% welcome discount
        Coupon::percentage("WELCOME10", 1000),
        // Always-on $5 off
        Coupon::fixed("SAVE5", 500),
        // 50% launch promo that ended last month
        {
            let mut c = Coupon::percentage("BLOWOUT50", 5000);
            c.valid_from = Some(now - Duration::days(60));
            c.valid_to = Some(now - Duration::days(30));
            c
        },
        // 20% promo that starts next week
        {
            let mut c = Coupon::percentage("VIP20", 2000);
            c.valid_from = Some(now + Duration::days(7));
            c
        },
        // Deactivated $2 off, kept for order history
        {
            let mut c = Coupon::fixed("RETIRED2", 200);
            c.is_active = false;
            c
        },
    ];

    for coupon in &coupons {
        if let Err(e) = db.coupons().insert(coupon).await {
            eprintln!("Failed to insert {}: {}", coupon.code, e);
            continue;
        }
        println!("  {} ({})", coupon.code, coupon.kind.storage_type());
    }

    println!("✓ Generated {} coupons", coupons.len());

    // Verify lookups behave
    println!();
    println!("Verifying...");
    let welcome = db.coupons().find_by_code("WELCOME10").await?;
    println!(
        "  find_by_code 'WELCOME10': {}",
        if welcome.is_some() { "found" } else { "MISSING" }
    );
    let lowercase = db.coupons().find_by_code("welcome10").await?;
    println!(
        "  find_by_code 'welcome10': {} (codes are case-sensitive)",
        if lowercase.is_none() { "absent" } else { "FOUND?!" }
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes logging for the seed run.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show repository debug messages
/// - Default: INFO level, sqlx chatter suppressed
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Generates a single product with deterministic data.
fn generate_product(
    category: &str,
    name: &str,
    variant: &str,
    price_cents: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    // Generate unique SKU
    let sku = format!(
        "{}-{}-{:03}",
        category,
        &name.replace(' ', "")[..3].to_uppercase(),
        seed
    );

    // Digital goods don't track inventory
    let track_inventory = category != "DIG";
    let available_stock = if track_inventory {
        Some(((seed * 7) % 50 + 5) as i64)
    } else {
        None
    };

    // Full product name with variant
    let full_name = format!("{} {}", name, variant);

    Product {
        id: Uuid::new_v4().to_string(),
        sku,
        name: full_name,
        description: None,
        price_cents,
        track_inventory,
        available_stock,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
