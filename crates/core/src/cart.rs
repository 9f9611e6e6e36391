//! Cart line arithmetic and order totals.
//!
//! A cart is stored as a bare list of `(productId, quantity)` pairs; product
//! data is joined in when the cart is read. Everything here is pure so the
//! merge rules can be exercised without a database.

use serde::{Deserialize, Serialize};

use crate::types::{Money, MoneyError, ProductId};

/// Upper bound on the quantity of a single cart line.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Errors from cart line operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    /// Adding zero items is meaningless.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The resulting line would exceed [`MAX_LINE_QUANTITY`].
    #[error("quantity cannot exceed {max}")]
    QuantityTooLarge {
        /// The cap that was exceeded.
        max: u32,
    },
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),
}

/// One stored cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The ordered set of lines in a cart, at most one per product.
///
/// Serialized as the plain JSON array kept in `carts.items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLines(Vec<CartLine>);

impl CartLines {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from stored lines, folding duplicates and dropping zero quantities.
    ///
    /// Rows written by older code may not respect the one-line-per-product
    /// rule; quantities are summed and clamped to the cap.
    #[must_use]
    pub fn from_stored(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.position(line.product_id) {
                Some(idx) => {
                    if let Some(existing) = cart.0.get_mut(idx) {
                        existing.quantity = existing
                            .quantity
                            .saturating_add(line.quantity)
                            .min(MAX_LINE_QUANTITY);
                    }
                }
                None => cart.0.push(CartLine {
                    product_id: line.product_id,
                    quantity: line.quantity.min(MAX_LINE_QUANTITY),
                }),
            }
        }
        cart
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// `ZeroQuantity` for a zero add, `QuantityTooLarge` if the merged line
    /// would exceed [`MAX_LINE_QUANTITY`]. The cart is unchanged on error.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<&CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        let too_large = CartError::QuantityTooLarge {
            max: MAX_LINE_QUANTITY,
        };

        let idx = match self.position(product_id) {
            Some(idx) => {
                let line = self.0.get_mut(idx).ok_or(CartError::LineNotFound(product_id))?;
                let merged = line
                    .quantity
                    .checked_add(quantity)
                    .filter(|q| *q <= MAX_LINE_QUANTITY)
                    .ok_or(too_large)?;
                line.quantity = merged;
                idx
            }
            None => {
                if quantity > MAX_LINE_QUANTITY {
                    return Err(too_large);
                }
                self.0.push(CartLine {
                    product_id,
                    quantity,
                });
                self.0.len() - 1
            }
        };

        self.0.get(idx).ok_or(CartError::LineNotFound(product_id))
    }

    /// Replace the quantity of an existing line; zero removes it.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if the product is not in the cart, `QuantityTooLarge`
    /// above the cap.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        let idx = self
            .position(product_id)
            .ok_or(CartError::LineNotFound(product_id))?;

        if quantity == 0 {
            self.0.remove(idx);
            return Ok(());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                max: MAX_LINE_QUANTITY,
            });
        }
        if let Some(line) = self.0.get_mut(idx) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.0.len();
        self.0.retain(|line| line.product_id != product_id);
        self.0.len() != before
    }

    /// Look up a product's line.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.0.iter().find(|line| line.product_id == product_id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    /// Product IDs in insertion order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.0.iter().map(|line| line.product_id).collect()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0.iter().map(|line| line.quantity).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.0.iter().position(|line| line.product_id == product_id)
    }
}

impl IntoIterator for CartLines {
    type Item = CartLine;
    type IntoIter = std::vec::IntoIter<CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A quantity paired with the unit price the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Money,
    pub quantity: u32,
}

impl PricedLine {
    /// `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit.
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.unit_price.times(self.quantity)
    }
}

/// Sum of all line totals.
///
/// # Errors
///
/// Returns `MoneyError::Overflow` if any intermediate value does not fit.
pub fn order_total(lines: &[PricedLine]) -> Result<Money, MoneyError> {
    lines
        .iter()
        .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.line_total()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pid(id: i32) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = CartLines::new();
        cart.add(pid(1), 2).unwrap();
        cart.add(pid(2), 1).unwrap();
        let merged = *cart.add(pid(1), 3).unwrap();

        assert_eq!(merged.quantity, 5);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.product_ids(), vec![pid(1), pid(2)]);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_add_rejects_zero_and_overflow_without_mutating() {
        let mut cart = CartLines::new();
        assert_eq!(cart.add(pid(1), 0), Err(CartError::ZeroQuantity));

        cart.add(pid(1), MAX_LINE_QUANTITY - 1).unwrap();
        assert_eq!(
            cart.add(pid(1), 2),
            Err(CartError::QuantityTooLarge { max: MAX_LINE_QUANTITY })
        );
        assert_eq!(cart.get(pid(1)).unwrap().quantity, MAX_LINE_QUANTITY - 1);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = CartLines::new();
        cart.add(pid(7), 4).unwrap();

        cart.set_quantity(pid(7), 2).unwrap();
        assert_eq!(cart.get(pid(7)).unwrap().quantity, 2);

        cart.set_quantity(pid(7), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = CartLines::new();
        assert_eq!(
            cart.set_quantity(pid(3), 1),
            Err(CartError::LineNotFound(pid(3)))
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartLines::new();
        cart.add(pid(1), 1).unwrap();
        assert!(cart.remove(pid(1)));
        assert!(!cart.remove(pid(1)));
    }

    #[test]
    fn test_from_stored_folds_duplicates() {
        let cart = CartLines::from_stored([
            CartLine { product_id: pid(1), quantity: 2 },
            CartLine { product_id: pid(2), quantity: 0 },
            CartLine { product_id: pid(1), quantity: 3 },
        ]);
        assert_eq!(cart.lines(), &[CartLine { product_id: pid(1), quantity: 5 }]);
    }

    #[test]
    fn test_stored_json_shape() {
        let mut cart = CartLines::new();
        cart.add(pid(4), 2).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!([{ "productId": 4, "quantity": 2 }]));
    }

    #[test]
    fn test_order_total_uses_unit_prices() {
        let lines = [
            PricedLine {
                unit_price: Money::from_cents(129_900).unwrap(),
                quantity: 2,
            },
            PricedLine {
                unit_price: Money::from_cents(84_900).unwrap(),
                quantity: 1,
            },
        ];
        assert_eq!(order_total(&lines).unwrap(), Money::from_cents(344_700).unwrap());
        assert_eq!(order_total(&[]).unwrap(), Money::ZERO);
    }
}
