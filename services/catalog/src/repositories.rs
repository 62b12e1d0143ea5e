//! Repositories for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewProduct, Product};

pub mod product;

pub use product::PgProductRepository;

/// Data-access operations behind the product handlers.
///
/// Each method is a single parameterized read or write; handlers call at
/// most one of them per request.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product in the catalog
    async fn find_all(&self) -> DatabaseResult<Vec<Product>>;

    /// Insert a product and return the stored record
    async fn insert(&self, product: &NewProduct) -> DatabaseResult<Product>;

    /// Find a product by id
    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Product>>;

    /// Products owned by a user
    async fn find_by_user(&self, id_usuario: i32) -> DatabaseResult<Vec<Product>>;

    /// Products of a brand
    async fn find_by_brand(&self, marca: &str) -> DatabaseResult<Vec<Product>>;

    /// Products of a type
    async fn find_by_type(&self, tipo: &str) -> DatabaseResult<Vec<Product>>;

    /// Products with a body style
    async fn find_by_body(&self, cuerpo: &str) -> DatabaseResult<Vec<Product>>;

    /// The most recently created products, newest first
    async fn find_latest(&self, limit: i64) -> DatabaseResult<Vec<Product>>;

    /// Set the stock of a product, returning the updated record or `None`
    /// when the product does not exist
    async fn set_stock(&self, id: i32, cantidad: f64) -> DatabaseResult<Option<Product>>;
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Database migrations applied");
    Ok(())
}
