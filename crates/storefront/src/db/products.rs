//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use lumina_core::{Money, ProductId};

use super::RepositoryError;
use crate::models::product::{Features, Product, ProductDraft, ProductQuery};

const PRODUCT_COLUMNS: &str = "id, name, description, price, sale_price, image_url, \
     light_image_url, category, tags, features, is_featured, in_stock, rating, rating_count, \
     created_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    sale_price: Option<Money>,
    image_url: String,
    light_image_url: Option<String>,
    category: String,
    tags: Vec<String>,
    features: Json<Features>,
    is_featured: bool,
    in_stock: bool,
    rating: f64,
    rating_count: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            sale_price: row.sale_price,
            image_url: row.image_url,
            light_image_url: row.light_image_url,
            category: row.category,
            tags: row.tags,
            features: row.features.0,
            is_featured: row.is_featured,
            in_stock: row.in_stock,
            rating: row.rating,
            rating_count: row.rating_count,
            created_at: row.created_at,
        }
    }
}

/// Products per category, for the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching every filter in `query`, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        // The ORDER BY clause comes from a fixed set of literals.
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::TEXT IS NULL OR LOWER(category) = LOWER($1))
              AND ($2::BOOLEAN IS NULL OR is_featured = $2)
              AND ($3::BOOLEAN IS NULL OR in_stock = $3)
            ORDER BY {}
            ",
            query.sort.order_by()
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(query.category())
            .bind(query.featured)
            .bind(query.in_stock)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Distinct category names, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Product::from))
    }

    /// Get several products at once. Missing IDs are simply absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::get_many_in(&mut *conn, ids).await
    }

    /// [`get_many`](Self::get_many) on an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many_in(
        conn: &mut PgConnection,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(raw)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Insert a product. Omitted rating fields start at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO products (name, description, price, sale_price, image_url,
                                  light_image_url, category, tags, features, is_featured,
                                  in_stock, rating, rating_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    COALESCE($12, 0), COALESCE($13, 0))
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(&draft.image_url)
        .bind(draft.light_image_url.as_deref())
        .bind(&draft.category)
        .bind(&draft.tags)
        .bind(Json(&draft.features))
        .bind(draft.is_featured)
        .bind(draft.in_stock)
        .bind(draft.rating)
        .bind(draft.rating_count)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a product. Omitted rating fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, sale_price = $5, image_url = $6,
                light_image_url = $7, category = $8, tags = $9, features = $10,
                is_featured = $11, in_stock = $12,
                rating = COALESCE($13, rating), rating_count = COALESCE($14, rating_count)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(&draft.image_url)
        .bind(draft.light_image_url.as_deref())
        .bind(&draft.category)
        .bind(&draft.tags)
        .bind(Json(&draft.features))
        .bind(draft.is_featured)
        .bind(draft.in_stock)
        .bind(draft.rating)
        .bind(draft.rating_count)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Product count per category, largest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_category(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
        let rows = sqlx::query_as(
            r"
            SELECT category, COUNT(*) AS count
            FROM products
            GROUP BY category
            ORDER BY count DESC, category
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
