//! Cart views returned to the client.

use serde::Serialize;

use lumina_core::{CartLines, Money, MoneyError, PricedLine, ProductId, order_total};

use super::product::Product;

/// One cart line joined with the current product data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Product,
    /// Effective price at read time.
    pub unit_price: Money,
    pub line_total: Money,
}

/// A user's cart as shown to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Money,
}

impl CartView {
    /// Join stored lines with products, in cart order.
    ///
    /// Lines whose product no longer exists are left out.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if a line total does not fit.
    pub fn build(lines: &CartLines, products: &[Product]) -> Result<Self, MoneyError> {
        let mut items = Vec::with_capacity(lines.len());
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines.lines() {
            let Some(product) = products.iter().find(|p| p.id == line.product_id) else {
                continue;
            };
            let priced_line = PricedLine {
                unit_price: product.effective_price(),
                quantity: line.quantity,
            };
            items.push(CartItem {
                product_id: line.product_id,
                quantity: line.quantity,
                product: product.clone(),
                unit_price: priced_line.unit_price,
                line_total: priced_line.line_total()?,
            });
            priced.push(priced_line);
        }

        Ok(Self {
            item_count: items.iter().map(|item| item.quantity).sum(),
            subtotal: order_total(&priced)?,
            items,
        })
    }

    /// A cart with nothing in it.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: Money::ZERO,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::product::Features;

    pub(crate) fn product(id: i32, price_cents: i64, sale_cents: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Lamp {id}"),
            description: "A lamp".to_owned(),
            price: Money::from_cents(price_cents).unwrap(),
            sale_price: sale_cents.map(|c| Money::from_cents(c).unwrap()),
            image_url: "https://img.example.com/lamp.jpg".to_owned(),
            light_image_url: None,
            category: "Pendants".to_owned(),
            tags: vec![],
            features: Features::new(),
            is_featured: false,
            in_stock: true,
            rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_joins_and_totals() {
        let mut lines = CartLines::new();
        lines.add(ProductId::new(1), 2).unwrap();
        lines.add(ProductId::new(2), 1).unwrap();
        let products = [product(2, 84_900, None), product(1, 159_900, Some(129_900))];

        let view = CartView::build(&lines, &products).unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].product_id, ProductId::new(1));
        assert_eq!(view.items[0].line_total.to_string(), "2598.00");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal.to_string(), "3447.00");
    }

    #[test]
    fn test_build_skips_deleted_products() {
        let mut lines = CartLines::new();
        lines.add(ProductId::new(1), 1).unwrap();
        lines.add(ProductId::new(99), 4).unwrap();

        let view = CartView::build(&lines, &[product(1, 69_900, Some(54_900))]).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.item_count, 1);
        assert_eq!(view.subtotal.to_string(), "549.00");
    }

    #[test]
    fn test_build_rejects_unstorable_subtotal() {
        let mut lines = CartLines::new();
        lines.add(ProductId::new(1), 999).unwrap();
        let products = [product(1, 2_000_000_000, None)];
        assert_eq!(
            CartView::build(&lines, &products).unwrap_err(),
            MoneyError::Overflow
        );

        lines.set_quantity(ProductId::new(1), 499).unwrap();
        let view = CartView::build(&lines, &products).unwrap();
        assert_eq!(view.subtotal.to_string(), "9980000000.00");
    }

    #[test]
    fn test_empty_json_shape() {
        let json = serde_json::to_value(CartView::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "items": [], "itemCount": 0, "subtotal": "0.00" })
        );
    }
}
