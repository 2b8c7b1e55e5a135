//! # Demo Data Seeder
//!
//! Populates a ledger database with the fixed demo dataset for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p ledger-store --bin seed
//!
//! # Specify database path
//! cargo run -p ledger-store --bin seed -- --db ./data/ledger.redb
//! ```
//!
//! The dataset is fixed (3 shops, 5 products, 15 inventory rows, 3 sales),
//! so reseeding a wiped database always yields the same contents.

use std::env;

use ledger_store::{Ledger, LedgerStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ledger_dev.redb");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Store Ledger Demo Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.redb)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Store Ledger Demo Seeder");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let store = LedgerStore::open(StoreConfig::new(&db_path))?;

    // A populated database is left alone; wipe the file to regenerate.
    if store.load_state()?.is_some() {
        println!("⚠ Database already has ledger data");
        println!("  Skipping seed to avoid clobbering it.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Opening a fresh store seeds and persists the demo dataset.
    let ledger = Ledger::open(store).await?;
    let state = ledger.snapshot().await;

    println!("✓ Seeded demo dataset");
    println!("  Shops:     {}", state.shops.len());
    println!("  Products:  {}", state.products.len());
    println!("  Inventory: {}", state.inventory.len());
    println!("  Sales:     {}", state.sales.len());

    Ok(())
}
