//! Presentation helpers shared by anything that renders a product.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::Product;

/// Quantity at or below which an in-stock product is flagged as low
pub const LOW_STOCK_LEVEL: u32 = 10;

/// Contact number used for product inquiries
pub const INQUIRY_PHONE: &str = "97517598338";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StockBadge {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockBadge {
    pub fn for_stock(in_stock: bool, quantity: u32) -> Self {
        if !in_stock || quantity == 0 {
            StockBadge::OutOfStock
        } else if quantity <= LOW_STOCK_LEVEL {
            StockBadge::LowStock
        } else {
            StockBadge::InStock
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockBadge::InStock => "In Stock",
            StockBadge::LowStock => "Low Stock",
            StockBadge::OutOfStock => "Out of Stock",
        }
    }
}

/// Strictly before `today`
pub fn is_expired(expiry: NaiveDate, today: NaiveDate) -> bool {
    expiry < today
}

/// On or before six calendar months from `today`
pub fn is_expiring_soon(expiry: NaiveDate, today: NaiveDate) -> bool {
    today
        .checked_add_months(Months::new(6))
        .is_none_or(|horizon| expiry <= horizon)
}

/// WhatsApp deep link with a prefilled inquiry naming the product.
pub fn inquiry_link(phone: &str, product_name: &str, product_id: &str) -> String {
    let message = format!(
        "Hi, I'm interested in {product_name} (ID: {product_id}). \
         Could you please provide more information about this product?"
    );
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(&message))
}

impl Product {
    pub fn stock_badge(&self) -> StockBadge {
        StockBadge::for_stock(self.in_stock(), self.stock_quantity)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        is_expired(self.expiry_date, today)
    }

    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        is_expiring_soon(self.expiry_date, today)
    }

    pub fn inquiry_link(&self, phone: &str) -> String {
        inquiry_link(phone, &self.name, &self.id)
    }
}
