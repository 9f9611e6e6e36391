//! Product catalogue types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumina_core::{Money, ProductId, effective_price};

use super::validation::{ValidationErrors, required_text};

/// Free-form product attributes (`material`, `bulbType`, `smartFeatures`, ...).
pub type Features = serde_json::Map<String, serde_json::Value>;

/// Highest allowed rating.
pub const MAX_RATING: f64 = 5.0;

/// A catalogue product.
///
/// Also embedded verbatim in order snapshots, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// List price.
    pub price: Money,
    /// Discounted price; never above `price`.
    pub sale_price: Option<Money>,
    pub image_url: String,
    /// Alternate image shown for the lit-up state.
    #[serde(default)]
    pub light_image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Features,
    pub is_featured: bool,
    pub in_stock: bool,
    pub rating: f64,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// What the customer pays per unit.
    #[must_use]
    pub fn effective_price(&self) -> Money {
        effective_price(self.price, self.sale_price)
    }
}

/// Product create/update request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub sale_price: Option<Money>,
    pub image_url: String,
    #[serde(default)]
    pub light_image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Option<Features>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Omitted on update keeps the stored rating.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<i32>,
}

const fn default_in_stock() -> bool {
    true
}

/// A validated, normalized [`ProductInput`] ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub sale_price: Option<Money>,
    pub image_url: String,
    pub light_image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub features: Features,
    pub is_featured: bool,
    pub in_stock: bool,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
}

impl ProductInput {
    /// Check every field and normalize text.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", &self.name);
        let description = required_text(&mut errors, "description", &self.description);
        let image_url = required_text(&mut errors, "imageUrl", &self.image_url);
        let category = required_text(&mut errors, "category", &self.category);

        if self.price.is_zero() {
            errors.add("price", "must be greater than 0");
        } else if !self.price.is_storable() {
            errors.add("price", format!("cannot exceed {}", Money::MAX));
        }
        if let Some(sale) = self.sale_price {
            if sale.is_zero() {
                errors.add("salePrice", "must be greater than 0");
            } else if sale > self.price {
                errors.add("salePrice", "cannot be higher than the price");
            } else if !sale.is_storable() {
                errors.add("salePrice", format!("cannot exceed {}", Money::MAX));
            }
        }
        if let Some(rating) = self.rating
            && !(0.0..=MAX_RATING).contains(&rating)
        {
            errors.add("rating", format!("must be between 0 and {MAX_RATING}"));
        }
        if let Some(count) = self.rating_count
            && count < 0
        {
            errors.add("ratingCount", "cannot be negative");
        }

        let light_image_url = self
            .light_image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned);

        errors.into_result(ProductDraft {
            name,
            description,
            price: self.price,
            sale_price: self.sale_price,
            image_url,
            light_image_url,
            category,
            tags: normalize_tags(self.tags),
            features: self.features.unwrap_or_default(),
            is_featured: self.is_featured,
            in_stock: self.in_stock,
            rating: self.rating,
            rating_count: self.rating_count,
        })
    }
}

/// Trim tags, drop empty ones and keep the first occurrence of duplicates.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

/// Sort orders for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl ProductSort {
    /// The `ORDER BY` clause for this sort. Ties always fall back to newest.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, id DESC",
            Self::PriceAsc => "COALESCE(sale_price, price) ASC, id DESC",
            Self::PriceDesc => "COALESCE(sale_price, price) DESC, id DESC",
            Self::Rating => "rating DESC, rating_count DESC, id DESC",
        }
    }
}

/// Product listing filters (`GET /api/products`).
///
/// All present filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive category name.
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductQuery {
    /// The category filter, ignoring blank values.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        serde_json::from_value(serde_json::json!({
            "name": " Crystal Nova Pendant ",
            "description": "Geometric crystal pendant",
            "price": 1599,
            "salePrice": "1299.00",
            "imageUrl": "https://img.example.com/nova.jpg",
            "category": "Pendants",
            "tags": [" modern", "crystal", "", "modern"],
            "features": { "material": "Crystal", "smartFeatures": true }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_input_is_normalized() {
        let draft = input().validate().unwrap();
        assert_eq!(draft.name, "Crystal Nova Pendant");
        assert_eq!(draft.tags, vec!["modern", "crystal"]);
        assert_eq!(draft.sale_price, Some(Money::from_cents(129_900).unwrap()));
        assert!(draft.in_stock);
        assert!(!draft.is_featured);
        assert_eq!(draft.rating, None);
        assert_eq!(draft.features["smartFeatures"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_sale_price_above_price_rejected() {
        let mut bad = input();
        bad.sale_price = Some(Money::from_cents(200_000).unwrap());
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors()[0].field, "salePrice");
    }

    #[test]
    fn test_sale_price_equal_to_price_allowed() {
        let mut ok = input();
        ok.sale_price = Some(ok.price);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_price_above_column_range_rejected() {
        let mut bad = input();
        bad.price = serde_json::from_value(serde_json::json!("100000000000")).unwrap();
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors()[0].field, "price");
        assert_eq!(errors.errors()[0].message, "cannot exceed 9999999999.99");

        let mut ok = input();
        ok.price = Money::MAX;
        ok.sale_price = None;
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_reports_every_bad_field() {
        let mut bad = input();
        bad.name = "  ".to_owned();
        bad.category = String::new();
        bad.price = Money::ZERO;
        bad.sale_price = None;
        bad.rating = Some(5.5);
        bad.rating_count = Some(-1);

        let errors = bad.validate().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "category", "price", "rating", "ratingCount"]);
    }

    #[test]
    fn test_query_parsing() {
        let query: ProductQuery =
            serde_json::from_value(serde_json::json!({ "category": " ", "sort": "price_desc" }))
                .unwrap();
        assert_eq!(query.category(), None);
        assert_eq!(query.sort, ProductSort::PriceDesc);
        assert_eq!(ProductQuery::default().sort, ProductSort::Newest);
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        let draft = input().validate().unwrap();
        let product = Product {
            id: ProductId::new(1),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            sale_price: draft.sale_price,
            image_url: draft.image_url,
            light_image_url: None,
            category: draft.category,
            tags: draft.tags,
            features: draft.features,
            is_featured: true,
            in_stock: true,
            rating: 4.5,
            rating_count: 42,
            created_at: Utc::now(),
        };
        assert_eq!(product.effective_price().to_string(), "1299.00");

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["salePrice"], "1299.00");
        assert_eq!(json["ratingCount"], 42);
    }
}
