//! Pricing Calculator
//!
//! Resolves requested line items against the catalog, captures price/name/
//! image snapshots, and computes subtotal, shipping, tax and total:
//!
//! - shipping: free for the standard tier above the configured threshold,
//!   otherwise a fixed fee per method tier
//! - tax: flat rate on the subtotal
//! - total: subtotal + shipping + tax
//!
//! Does not touch stock and persists nothing.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::models::OrderItem;
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

/// Rounding: 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Shipping method tier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

/// Pricing constants. Business configuration, not hard-coded law.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Standard shipping is free above this subtotal
    pub free_shipping_threshold: f64,
    pub standard_fee: f64,
    pub express_fee: f64,
    pub overnight_fee: f64,
    /// Flat tax rate (e.g. 0.08 = 8%)
    pub tax_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 100.0,
            standard_fee: 9.99,
            express_fee: 15.99,
            overnight_fee: 29.99,
            tax_rate: 0.08,
        }
    }
}

impl PricingConfig {
    fn fee_for(&self, method: ShippingMethod) -> f64 {
        match method {
            ShippingMethod::Standard => self.standard_fee,
            ShippingMethod::Express => self.express_fee,
            ShippingMethod::Overnight => self.overnight_fee,
        }
    }
}

/// Requested line before catalog resolution
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequest {
    pub product_id: String,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Resolved line items plus the four monetary figures
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

pub struct PricingCalculator {
    products: ProductRepository,
    config: PricingConfig,
}

impl PricingCalculator {
    pub fn new(products: ProductRepository, config: PricingConfig) -> Self {
        Self { products, config }
    }

    /// Resolve items and compute all monetary figures.
    ///
    /// Fails with `NotFound` when any product id does not resolve and with
    /// `Validation` on an empty item list or non-positive quantity.
    pub async fn price(
        &self,
        items: &[ItemRequest],
        method: ShippingMethod,
    ) -> AppResult<PricedOrder> {
        if items.is_empty() {
            return Err(AppError::validation("No order items provided"));
        }

        let mut resolved = Vec::with_capacity(items.len());
        let mut subtotal = Decimal::ZERO;

        for item in items {
            if item.quantity < 1 {
                return Err(AppError::validation(format!(
                    "Quantity must be at least 1, got {}",
                    item.quantity
                )));
            }

            let product = self
                .products
                .find_by_id(&item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", item.product_id))
                })?;

            let product_id = product
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Product record without id"))?;

            subtotal += to_decimal(product.price) * Decimal::from(item.quantity);

            resolved.push(OrderItem {
                product: product_id,
                name: product.name,
                price: product.price,
                quantity: item.quantity,
                size: item.size.clone().unwrap_or(product.size),
                color: item.color.clone(),
                image: product.image,
            });
        }

        let shipping = self.shipping_fee(subtotal, method);
        let tax = subtotal * to_decimal(self.config.tax_rate);
        let total = subtotal + shipping + tax;

        Ok(PricedOrder {
            items: resolved,
            subtotal: to_f64(subtotal),
            shipping: to_f64(shipping),
            tax: to_f64(tax),
            total: to_f64(total),
        })
    }

    fn shipping_fee(&self, subtotal: Decimal, method: ShippingMethod) -> Decimal {
        if method == ShippingMethod::Standard
            && subtotal > to_decimal(self.config.free_shipping_threshold)
        {
            return Decimal::ZERO;
        }
        to_decimal(self.config.fee_for(method))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Product;
    use crate::db::{self};

    async fn seed_products(prices: &[f64]) -> (ProductRepository, Vec<String>) {
        let handle = db::connect_memory().await.expect("in-memory db");
        let repo = ProductRepository::new(handle);
        let mut ids = Vec::new();
        for (i, price) in prices.iter().enumerate() {
            let created = repo
                .create(Product::new(format!("Perfume {i}"), *price))
                .await
                .expect("seed product");
            ids.push(created.id.expect("product id").to_string());
        }
        (repo, ids)
    }

    fn requests(ids: &[String]) -> Vec<ItemRequest> {
        ids.iter()
            .map(|id| ItemRequest {
                product_id: id.clone(),
                quantity: 1,
                size: None,
                color: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn standard_shipping_free_over_threshold() {
        let (repo, ids) = seed_products(&[50.0, 60.0]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let priced = calc
            .price(&requests(&ids), ShippingMethod::Standard)
            .await
            .expect("priced");

        assert_eq!(priced.subtotal, 110.0);
        assert_eq!(priced.shipping, 0.0);
        assert_eq!(priced.tax, 8.8);
        assert_eq!(priced.total, 118.8);
    }

    #[tokio::test]
    async fn express_fee_applies_regardless_of_subtotal() {
        let (repo, ids) = seed_products(&[50.0, 60.0]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let priced = calc
            .price(&requests(&ids), ShippingMethod::Express)
            .await
            .expect("priced");

        assert_eq!(priced.shipping, 15.99);
        assert_eq!(priced.tax, 8.8);
        assert_eq!(priced.total, 134.79);
    }

    #[tokio::test]
    async fn standard_fee_below_threshold() {
        let (repo, ids) = seed_products(&[40.0]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let priced = calc
            .price(&requests(&ids), ShippingMethod::Standard)
            .await
            .expect("priced");

        assert_eq!(priced.subtotal, 40.0);
        assert_eq!(priced.shipping, 9.99);
        assert_eq!(priced.tax, 3.2);
        assert_eq!(priced.total, 53.19);
    }

    #[tokio::test]
    async fn total_is_exact_sum_of_components() {
        let (repo, ids) = seed_products(&[19.99, 34.5, 7.25]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let priced = calc
            .price(&requests(&ids), ShippingMethod::Overnight)
            .await
            .expect("priced");

        let recomputed = to_f64(
            to_decimal(priced.subtotal) + to_decimal(priced.shipping) + to_decimal(priced.tax),
        );
        assert_eq!(priced.total, recomputed);
    }

    #[tokio::test]
    async fn unknown_product_fails_with_not_found() {
        let (repo, _) = seed_products(&[]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let request = vec![ItemRequest {
            product_id: "product:missing".to_string(),
            quantity: 1,
            size: None,
            color: None,
        }];
        let err = calc
            .price(&request, ShippingMethod::Standard)
            .await
            .expect_err("should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_item_list_is_rejected() {
        let (repo, _) = seed_products(&[]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let err = calc
            .price(&[], ShippingMethod::Standard)
            .await
            .expect_err("should fail");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn quantity_multiplies_unit_price() {
        let (repo, ids) = seed_products(&[25.0]).await;
        let calc = PricingCalculator::new(repo, PricingConfig::default());

        let request = vec![ItemRequest {
            product_id: ids[0].clone(),
            quantity: 3,
            size: Some("50ml".to_string()),
            color: None,
        }];
        let priced = calc
            .price(&request, ShippingMethod::Standard)
            .await
            .expect("priced");

        assert_eq!(priced.subtotal, 75.0);
        assert_eq!(priced.items[0].quantity, 3);
        assert_eq!(priced.items[0].size, "50ml");
    }
}
