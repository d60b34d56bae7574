//! Product data for the negotiation game.

use serde::{Deserialize, Serialize};

/// Expected demand at one discount rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    /// Discount in whole percent.
    pub discount: u32,
    pub mean_units: f64,
    pub std_units: f64,
}

/// A product up for negotiation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub cost: f64,
    pub demand: Vec<DemandPoint>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            price,
            cost,
            demand: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_demand(mut self, discount: u32, mean_units: f64, std_units: f64) -> Self {
        self.demand.push(DemandPoint {
            discount,
            mean_units,
            std_units,
        });
        self
    }

    #[must_use]
    pub fn demand_at(&self, discount: u32) -> Option<&DemandPoint> {
        self.demand.iter().find(|d| d.discount == discount)
    }

    /// Unit price after a discount.
    #[must_use]
    pub fn discounted_price(&self, discount: u32) -> f64 {
        self.price * (1.0 - f64::from(discount) / 100.0)
    }

    /// Expected revenue at a discount.
    #[must_use]
    pub fn mean_sales(&self, discount: u32) -> f64 {
        self.demand_at(discount)
            .map_or(0.0, |d| d.mean_units * self.discounted_price(discount))
    }

    /// Expected profit at a discount.
    #[must_use]
    pub fn mean_profit(&self, discount: u32) -> f64 {
        self.demand_at(discount)
            .map_or(0.0, |d| d.mean_units * (self.discounted_price(discount) - self.cost))
    }
}

/// Discounts offered by every product, ascending.
#[must_use]
pub fn allowed_discounts(products: &[Product]) -> Vec<u32> {
    let Some((first, rest)) = products.split_first() else {
        return Vec::new();
    };
    let mut allowed: Vec<u32> = first
        .demand
        .iter()
        .map(|d| d.discount)
        .filter(|d| rest.iter().all(|p| p.demand_at(*d).is_some()))
        .collect();
    allowed.sort_unstable();
    allowed.dedup();
    allowed
}

/// Built-in sample catalog.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("Wireless Earbuds", 80.0, 35.0)
            .with_demand(0, 100.0, 15.0)
            .with_demand(10, 125.0, 18.0)
            .with_demand(20, 155.0, 22.0)
            .with_demand(30, 190.0, 28.0),
        Product::new("Smart Watch", 200.0, 110.0)
            .with_demand(0, 40.0, 8.0)
            .with_demand(10, 50.0, 9.0)
            .with_demand(20, 62.0, 11.0)
            .with_demand(30, 78.0, 14.0),
        Product::new("Bluetooth Speaker", 60.0, 25.0)
            .with_demand(0, 150.0, 20.0)
            .with_demand(10, 180.0, 24.0)
            .with_demand(20, 215.0, 28.0)
            .with_demand(30, 255.0, 34.0),
        Product::new("Phone Case", 25.0, 8.0)
            .with_demand(0, 400.0, 50.0)
            .with_demand(10, 460.0, 55.0)
            .with_demand(20, 530.0, 62.0)
            .with_demand(30, 610.0, 70.0),
        Product::new("Fitness Tracker", 90.0, 45.0)
            .with_demand(0, 80.0, 12.0)
            .with_demand(10, 98.0, 14.0)
            .with_demand(20, 120.0, 17.0)
            .with_demand(30, 146.0, 20.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_discounts() {
        assert_eq!(allowed_discounts(&catalog()), vec![0, 10, 20, 30]);
        assert!(allowed_discounts(&[]).is_empty());
    }

    #[test]
    fn test_allowed_is_intersection() {
        let products = vec![
            Product::new("a", 10.0, 5.0).with_demand(0, 1.0, 0.0).with_demand(15, 2.0, 0.0),
            Product::new("b", 10.0, 5.0).with_demand(0, 1.0, 0.0).with_demand(20, 2.0, 0.0),
        ];
        assert_eq!(allowed_discounts(&products), vec![0]);
    }

    #[test]
    fn test_expected_sales_and_profit() {
        let product = Product::new("x", 100.0, 60.0).with_demand(20, 10.0, 1.0);
        assert!((product.discounted_price(20) - 80.0).abs() < 1e-9);
        assert!((product.mean_sales(20) - 800.0).abs() < 1e-9);
        assert!((product.mean_profit(20) - 200.0).abs() < 1e-9);
        assert_eq!(product.mean_sales(10), 0.0);
    }
}
