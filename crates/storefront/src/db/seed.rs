//! Sample lighting catalogue for new installations.

use serde_json::json;
use sqlx::PgPool;

use lumina_core::Money;

use super::{ProductRepository, RepositoryError};
use crate::models::product::{Features, ProductDraft};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    sale_price: Option<i64>,
    image_url: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    material: &'static str,
    dimensions: &'static str,
    bulb_type: &'static str,
    smart: bool,
    featured: bool,
    rating: f64,
    rating_count: i32,
}

const CATALOGUE: &[SeedProduct] = &[
    SeedProduct {
        name: "Crystal Nova Pendant",
        description: "Modern geometric design with premium crystal elements and smart RGB lighting system.",
        price: 1599,
        sale_price: Some(1299),
        image_url: "https://images.unsplash.com/photo-1592833167001-55c6233fc83e?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Pendants",
        tags: &["modern", "crystal", "smart"],
        material: "Crystal",
        dimensions: "60cm x 60cm",
        bulb_type: "LED",
        smart: true,
        featured: true,
        rating: 4.5,
        rating_count: 42,
    },
    SeedProduct {
        name: "Geometric Hexa Light",
        description: "Hexagonal pendant with warm ambient lighting, perfect for dining rooms and modern interiors.",
        price: 849,
        sale_price: None,
        image_url: "https://images.unsplash.com/photo-1513506003901-1e6a229e2d15?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Pendants",
        tags: &["modern", "geometric"],
        material: "Aluminum",
        dimensions: "45cm diameter",
        bulb_type: "LED",
        smart: false,
        featured: false,
        rating: 4.0,
        rating_count: 36,
    },
    SeedProduct {
        name: "Celestial Smart Ceiling",
        description: "Wi-Fi enabled smart lighting with customizable patterns, voice control and app integration.",
        price: 2299,
        sale_price: Some(1999),
        image_url: "https://images.unsplash.com/photo-1536528906775-c0c07c0ac0f1?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Smart Lighting",
        tags: &["smart", "ceiling", "modern"],
        material: "Aluminum and Acrylic",
        dimensions: "120cm x 80cm",
        bulb_type: "LED RGB",
        smart: true,
        featured: true,
        rating: 5.0,
        rating_count: 59,
    },
    SeedProduct {
        name: "Linear Float Chandelier",
        description: "Minimalist linear design with adjustable height and warm LED lighting for dining tables.",
        price: 699,
        sale_price: None,
        image_url: "https://images.unsplash.com/photo-1572385226827-c9c0abed35e6?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Chandeliers",
        tags: &["modern", "minimalist", "dining"],
        material: "Metal",
        dimensions: "120cm length",
        bulb_type: "LED",
        smart: false,
        featured: false,
        rating: 3.5,
        rating_count: 28,
    },
    SeedProduct {
        name: "Royal Gold Cascades",
        description: "Luxury gold-plated chandelier with cascading crystal elements for grand entrances and halls.",
        price: 4299,
        sale_price: None,
        image_url: "https://images.unsplash.com/photo-1565814329452-e1efa11c5b89?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Chandeliers",
        tags: &["luxury", "gold", "crystal"],
        material: "Gold-plated metal and crystal",
        dimensions: "100cm diameter, 120cm height",
        bulb_type: "LED",
        smart: false,
        featured: true,
        rating: 5.0,
        rating_count: 47,
    },
    SeedProduct {
        name: "Industrial Pendant Cluster",
        description: "Industrial-style pendant cluster with vintage Edison bulbs, perfect for restaurants and lofts.",
        price: 699,
        sale_price: Some(549),
        image_url: "https://images.unsplash.com/photo-1524484485831-a92ffc0de03f?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80",
        category: "Pendants",
        tags: &["industrial", "vintage", "cluster"],
        material: "Metal",
        dimensions: "Cluster of 5-8 pendants",
        bulb_type: "Edison",
        smart: false,
        featured: false,
        rating: 4.0,
        rating_count: 32,
    },
];

impl SeedProduct {
    fn to_draft(&self) -> Result<ProductDraft, RepositoryError> {
        let money = |whole: i64| {
            Money::from_cents(whole * 100)
                .map_err(|e| RepositoryError::DataCorruption(format!("seed price: {e}")))
        };

        let mut features = Features::new();
        features.insert("material".to_owned(), json!(self.material));
        features.insert("dimensions".to_owned(), json!(self.dimensions));
        features.insert("bulbType".to_owned(), json!(self.bulb_type));
        features.insert("smartFeatures".to_owned(), json!(self.smart));

        Ok(ProductDraft {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            price: money(self.price)?,
            sale_price: self.sale_price.map(money).transpose()?,
            image_url: self.image_url.to_owned(),
            light_image_url: None,
            category: self.category.to_owned(),
            tags: self.tags.iter().map(|t| (*t).to_owned()).collect(),
            features,
            is_featured: self.featured,
            in_stock: true,
            rating: Some(self.rating),
            rating_count: Some(self.rating_count),
        })
    }
}

/// The sample catalogue as drafts.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if a built-in price is invalid.
pub fn sample_catalogue() -> Result<Vec<ProductDraft>, RepositoryError> {
    CATALOGUE.iter().map(SeedProduct::to_draft).collect()
}

/// Insert the sample catalogue.
///
/// Does nothing when products already exist unless `force` is set.
///
/// # Returns
///
/// The number of products inserted.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails.
pub async fn seed_products(pool: &PgPool, force: bool) -> Result<usize, RepositoryError> {
    let products = ProductRepository::new(pool);
    if !force && products.count().await? > 0 {
        tracing::info!("Products already present, skipping seed");
        return Ok(0);
    }

    let drafts = sample_catalogue()?;
    for draft in &drafts {
        products.create(draft).await?;
    }

    tracing::info!(count = drafts.len(), "Seeded sample products");
    Ok(drafts.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_valid() {
        let drafts = sample_catalogue().unwrap();
        assert_eq!(drafts.len(), 6);
        for draft in &drafts {
            if let Some(sale) = draft.sale_price {
                assert!(sale <= draft.price, "{} sale above price", draft.name);
            }
            assert!(draft.features.contains_key("bulbType"));
        }
        assert_eq!(drafts.iter().filter(|d| d.is_featured).count(), 3);
    }

    #[test]
    fn test_catalogue_prices() {
        let nova = &sample_catalogue().unwrap()[0];
        assert_eq!(nova.price.to_string(), "1599.00");
        assert_eq!(nova.sale_price.unwrap().to_string(), "1299.00");
    }
}
