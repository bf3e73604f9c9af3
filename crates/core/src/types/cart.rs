//! Session-local cart lines.
//!
//! The storefront keeps the cart in the visitor's session only. It is never
//! reconciled with a backend cart; an order is created from it at checkout.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A line in the visitor's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    /// Variant label shown under the name (e.g. "Size M").
    #[serde(default)]
    pub variant: Option<String>,
    pub unit_price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Sum of line totals.
#[must_use]
pub fn cart_subtotal(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Total quantity across lines.
#[must_use]
pub fn cart_item_count(items: &[CartItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Hoa {id}"),
            variant: None,
            unit_price: Price::from_vnd(price),
            quantity,
            image_url: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("a", 150_000, 3).line_total(), Price::from_vnd(450_000));
    }

    #[test]
    fn test_subtotal_and_count() {
        let items = vec![item("a", 150_000, 2), item("b", 90_000, 1)];
        assert_eq!(cart_subtotal(&items), Price::from_vnd(390_000));
        assert_eq!(cart_item_count(&items), 3);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_subtotal(&[]), Price::from_vnd(0));
        assert_eq!(cart_item_count(&[]), 0);
    }
}
