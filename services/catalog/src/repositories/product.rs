//! PostgreSQL product repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};

use super::ProductRepository;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id_producto, id_usuario, nombre, marca, tipo, cuerpo, alto, ancho, \
     precio, foto, detalle, stock, color";

/// Product repository backed by the `productos` table
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, filter: &str, value: &str) -> DatabaseResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM productos WHERE {} = $1 ORDER BY id_producto",
            PRODUCT_COLUMNS, filter
        );

        let rows = sqlx::query(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        map_rows(rows)
    }
}

fn map_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id_producto: row.try_get("id_producto")?,
        id_usuario: row.try_get("id_usuario")?,
        nombre: row.try_get("nombre")?,
        marca: row.try_get("marca")?,
        tipo: row.try_get("tipo")?,
        cuerpo: row.try_get("cuerpo")?,
        alto: row.try_get("alto")?,
        ancho: row.try_get("ancho")?,
        precio: row.try_get("precio")?,
        foto: row.try_get("foto")?,
        detalle: row.try_get("detalle")?,
        stock: row.try_get("stock")?,
        color: row.try_get("color")?,
    })
}

fn map_rows(rows: Vec<PgRow>) -> DatabaseResult<Vec<Product>> {
    rows.iter()
        .map(map_product)
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Query)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> DatabaseResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM productos ORDER BY id_producto", PRODUCT_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        map_rows(rows)
    }

    async fn insert(&self, product: &NewProduct) -> DatabaseResult<Product> {
        // Numeric binds are float8; PostgreSQL rounds them into the integer columns.
        let sql = format!(
            r#"
            INSERT INTO productos
                (id_usuario, nombre, marca, tipo, cuerpo, alto, ancho, precio, foto, detalle, stock, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(product.id_usuario)
            .bind(&product.nombre)
            .bind(&product.marca)
            .bind(&product.tipo)
            .bind(&product.cuerpo)
            .bind(product.alto)
            .bind(product.ancho)
            .bind(product.precio)
            .bind(&product.foto)
            .bind(&product.detalle)
            .bind(product.stock)
            .bind(&product.color)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        map_product(&row).map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Product>> {
        let sql = format!("SELECT {} FROM productos WHERE id_producto = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref()
            .map(map_product)
            .transpose()
            .map_err(DatabaseError::Query)
    }

    async fn find_by_user(&self, id_usuario: i32) -> DatabaseResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM productos WHERE id_usuario = $1 ORDER BY id_producto",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(id_usuario)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        map_rows(rows)
    }

    async fn find_by_brand(&self, marca: &str) -> DatabaseResult<Vec<Product>> {
        self.fetch_where("marca", marca).await
    }

    async fn find_by_type(&self, tipo: &str) -> DatabaseResult<Vec<Product>> {
        self.fetch_where("tipo", tipo).await
    }

    async fn find_by_body(&self, cuerpo: &str) -> DatabaseResult<Vec<Product>> {
        self.fetch_where("cuerpo", cuerpo).await
    }

    async fn find_latest(&self, limit: i64) -> DatabaseResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM productos ORDER BY id_producto DESC LIMIT $1",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        map_rows(rows)
    }

    async fn set_stock(&self, id: i32, cantidad: f64) -> DatabaseResult<Option<Product>> {
        let sql = format!(
            "UPDATE productos SET stock = $2 WHERE id_producto = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(cantidad)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref()
            .map(map_product)
            .transpose()
            .map_err(DatabaseError::Query)
    }
}
