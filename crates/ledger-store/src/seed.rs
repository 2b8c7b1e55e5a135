//! # Demo Dataset
//!
//! The fixed dataset a fresh store is populated with: three shops, five
//! products, a full inventory grid (one entry per shop/product pair), and
//! three recorded sales spanning two billing months.
//!
//! Every value is pinned, including timestamps, so two fresh stores are
//! byte-for-byte identical and tests can assert against known IDs.

use chrono::{DateTime, TimeZone, Utc};

use ledger_core::{
    InventoryEntry, Product, Sale, SaleItem, SaleStatus, SaleType, Shop,
};

use crate::persistence::LedgerState;

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("fixed demo date")
}

fn datetime(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .expect("fixed demo date")
}

/// Builds the complete demo state.
pub fn demo_dataset() -> LedgerState {
    LedgerState {
        shops: demo_shops(),
        products: demo_products(),
        inventory: demo_inventory(),
        sales: demo_sales(),
        active_shop: None,
    }
}

fn demo_shops() -> Vec<Shop> {
    vec![
        Shop {
            id: "shop1".to_string(),
            name: "Downtown Grocery".to_string(),
            store_number: "DT001".to_string(),
            address: "123 Main St, Downtown".to_string(),
            manager_id: Some("2".to_string()),
            super_admin_id: None,
            phone: Some("555-123-4567".to_string()),
            email: Some("downtown@shopsavvy.com".to_string()),
            created_at: date(2023, 1, 15),
        },
        Shop {
            id: "shop2".to_string(),
            name: "Uptown Market".to_string(),
            store_number: "UT002".to_string(),
            address: "456 High St, Uptown".to_string(),
            manager_id: None,
            super_admin_id: None,
            phone: Some("555-987-6543".to_string()),
            email: Some("uptown@shopsavvy.com".to_string()),
            created_at: date(2023, 4, 10),
        },
        Shop {
            id: "shop3".to_string(),
            name: "Westside Mart".to_string(),
            store_number: "WS003".to_string(),
            address: "789 West Ave, Westside".to_string(),
            manager_id: None,
            super_admin_id: None,
            phone: Some("555-456-7890".to_string()),
            email: Some("westside@shopsavvy.com".to_string()),
            created_at: date(2023, 6, 22),
        },
    ]
}

fn product(
    id: &str,
    name: &str,
    sku: &str,
    category: &str,
    price: f64,
    cost: f64,
    description: &str,
    image: &str,
    stock: i64,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        sku: sku.to_string(),
        category: category.to_string(),
        price,
        cost,
        description: Some(description.to_string()),
        image: Some(image.to_string()),
        is_active: true,
        expiry_date: None,
        stock,
    }
}

fn demo_products() -> Vec<Product> {
    vec![
        product(
            "prod1",
            "Organic Milk",
            "OM001",
            "Dairy",
            4.99,
            3.50,
            "Fresh organic whole milk, 1 gallon",
            "https://placehold.co/200x200?text=Milk",
            100,
        ),
        product(
            "prod2",
            "Whole Wheat Bread",
            "WB002",
            "Bakery",
            3.99,
            2.25,
            "Artisan whole wheat bread, 1 loaf",
            "https://placehold.co/200x200?text=Bread",
            75,
        ),
        product(
            "prod3",
            "Organic Eggs",
            "OE003",
            "Dairy",
            5.99,
            4.25,
            "Free-range organic eggs, dozen",
            "https://placehold.co/200x200?text=Eggs",
            120,
        ),
        product(
            "prod4",
            "Avocados",
            "AV004",
            "Produce",
            2.50,
            1.75,
            "Ripe Hass avocados, each",
            "https://placehold.co/200x200?text=Avocado",
            200,
        ),
        product(
            "prod5",
            "Ground Coffee",
            "GC005",
            "Beverages",
            11.99,
            8.50,
            "Premium ground coffee, 12 oz bag",
            "https://placehold.co/200x200?text=Coffee",
            85,
        ),
    ]
}

fn demo_inventory() -> Vec<InventoryEntry> {
    let rows: [(&str, &str, i64, i64); 15] = [
        ("shop1", "prod1", 50, 10),
        ("shop1", "prod2", 35, 5),
        ("shop1", "prod3", 28, 8),
        ("shop1", "prod4", 40, 10),
        ("shop1", "prod5", 12, 5),
        ("shop2", "prod1", 35, 10),
        ("shop2", "prod2", 20, 5),
        ("shop2", "prod3", 15, 8),
        ("shop2", "prod4", 25, 10),
        ("shop2", "prod5", 8, 5),
        ("shop3", "prod1", 25, 10),
        ("shop3", "prod2", 15, 5),
        ("shop3", "prod3", 22, 8),
        ("shop3", "prod4", 35, 10),
        ("shop3", "prod5", 10, 5),
    ];

    rows.iter()
        .map(|&(shop_id, product_id, quantity, min_stock_level)| InventoryEntry {
            shop_id: shop_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            min_stock_level,
            last_updated: date(2024, 1, 1),
        })
        .collect()
}

fn demo_sales() -> Vec<Sale> {
    vec![
        Sale {
            id: "INV-202403-001".to_string(),
            shop_id: "shop1".to_string(),
            sale_type: SaleType::Cash,
            items: vec![
                SaleItem {
                    product_id: "prod1".to_string(),
                    quantity: 2,
                    price: 4.99,
                    total: 9.98,
                },
                SaleItem {
                    product_id: "prod2".to_string(),
                    quantity: 1,
                    price: 3.99,
                    total: 3.99,
                },
            ],
            total: 13.97,
            paid: 13.97,
            balance: 0.0,
            created_by: "2".to_string(),
            created_at: datetime(2024, 3, 8, 10, 30),
            status: SaleStatus::Completed,
        },
        Sale {
            id: "INV-202403-002".to_string(),
            shop_id: "shop2".to_string(),
            sale_type: SaleType::Online,
            items: vec![SaleItem {
                product_id: "prod5".to_string(),
                quantity: 1,
                price: 11.99,
                total: 11.99,
            }],
            total: 11.99,
            paid: 11.99,
            balance: 0.0,
            created_by: "1".to_string(),
            created_at: datetime(2024, 3, 21, 15, 45),
            status: SaleStatus::Completed,
        },
        Sale {
            id: "INV-202404-001".to_string(),
            shop_id: "shop3".to_string(),
            sale_type: SaleType::Cash,
            items: vec![
                SaleItem {
                    product_id: "prod3".to_string(),
                    quantity: 2,
                    price: 5.99,
                    total: 11.98,
                },
                SaleItem {
                    product_id: "prod4".to_string(),
                    quantity: 3,
                    price: 2.50,
                    total: 7.50,
                },
            ],
            total: 19.48,
            paid: 19.48,
            balance: 0.0,
            created_by: "1".to_string(),
            created_at: datetime(2024, 4, 2, 9, 15),
            status: SaleStatus::Completed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_is_deterministic() {
        assert_eq!(demo_dataset(), demo_dataset());
    }

    #[test]
    fn test_dataset_shape() {
        let state = demo_dataset();
        assert_eq!(state.shops.len(), 3);
        assert_eq!(state.products.len(), 5);
        assert_eq!(state.inventory.len(), 15);
        assert_eq!(state.sales.len(), 3);
        assert_eq!(state.active_shop, None);
    }

    #[test]
    fn test_inventory_covers_every_shop_product_pair() {
        let state = demo_dataset();
        for shop in &state.shops {
            for product in &state.products {
                assert!(
                    state
                        .inventory
                        .iter()
                        .any(|e| e.shop_id == shop.id && e.product_id == product.id),
                    "missing inventory entry for {}/{}",
                    shop.id,
                    product.id
                );
            }
        }
    }

    #[test]
    fn test_sale_ids_follow_monthly_sequence() {
        let state = demo_dataset();
        let ids: Vec<&str> = state.sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["INV-202403-001", "INV-202403-002", "INV-202404-001"]);
    }

    #[test]
    fn test_sale_totals_match_line_items() {
        for sale in demo_dataset().sales {
            let line_sum: f64 = sale.items.iter().map(|i| i.total).sum();
            assert!((sale.total - line_sum).abs() < 1e-9, "sale {}", sale.id);
            assert_eq!(sale.balance, 0.0);
        }
    }

    #[test]
    fn test_all_references_resolve() {
        let state = demo_dataset();
        let shop_ids: Vec<&str> = state.shops.iter().map(|s| s.id.as_str()).collect();
        let product_ids: Vec<&str> = state.products.iter().map(|p| p.id.as_str()).collect();

        for entry in &state.inventory {
            assert!(shop_ids.contains(&entry.shop_id.as_str()));
            assert!(product_ids.contains(&entry.product_id.as_str()));
        }
        for sale in &state.sales {
            assert!(shop_ids.contains(&sale.shop_id.as_str()));
            for item in &sale.items {
                assert!(product_ids.contains(&item.product_id.as_str()));
            }
        }
    }
}
