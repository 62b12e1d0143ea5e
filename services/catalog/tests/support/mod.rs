#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use catalog::{
    AppState,
    jwt::JwtService,
    models::{NewProduct, Product},
    repositories::ProductRepository,
    routes::create_router,
};
use common::error::{DatabaseError, DatabaseResult};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower::ServiceExt;

pub const SECRET: &str = "catalog-test-secret";

/// Product store kept in memory, with a switch to make every call fail.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
    next_id: AtomicI32,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryProductRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following call fail like a dropped connection pool
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of data-access calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, product: NewProduct) -> Product {
        self.store(&product).await
    }

    async fn store(&self, product: &NewProduct) -> Product {
        let stored = Product {
            id_producto: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            id_usuario: product.id_usuario.map(round),
            nombre: product.nombre.clone(),
            marca: product.marca.clone(),
            tipo: product.tipo.clone(),
            cuerpo: product.cuerpo.clone(),
            alto: product.alto,
            ancho: product.ancho,
            precio: round(product.precio),
            foto: product.foto.clone(),
            detalle: product.detalle.clone(),
            stock: round(product.stock),
            color: product.color.clone(),
        };
        self.products.write().await.push(stored.clone());
        stored
    }

    fn enter(&self) -> DatabaseResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn filter(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products
            .read()
            .await
            .iter()
            .filter(|p| keep(p))
            .cloned()
            .collect()
    }
}

fn round(n: f64) -> i32 {
    n.round_ties_even() as i32
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        Ok(self.products.read().await.clone())
    }

    async fn insert(&self, product: &NewProduct) -> DatabaseResult<Product> {
        self.enter()?;
        Ok(self.store(product).await)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Product>> {
        self.enter()?;
        Ok(self.filter(|p| p.id_producto == id).await.into_iter().next())
    }

    async fn find_by_user(&self, id_usuario: i32) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        Ok(self.filter(|p| p.id_usuario == Some(id_usuario)).await)
    }

    async fn find_by_brand(&self, marca: &str) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        Ok(self.filter(|p| p.marca == marca).await)
    }

    async fn find_by_type(&self, tipo: &str) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        Ok(self.filter(|p| p.tipo == tipo).await)
    }

    async fn find_by_body(&self, cuerpo: &str) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        Ok(self.filter(|p| p.cuerpo == cuerpo).await)
    }

    async fn find_latest(&self, limit: i64) -> DatabaseResult<Vec<Product>> {
        self.enter()?;
        let products = self.products.read().await;
        Ok(products
            .iter()
            .rev()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn set_stock(&self, id: i32, cantidad: f64) -> DatabaseResult<Option<Product>> {
        self.enter()?;
        let mut products = self.products.write().await;
        Ok(products
            .iter_mut()
            .find(|p| p.id_producto == id)
            .map(|p| {
                p.stock = round(cantidad);
                p.clone()
            }))
    }
}

pub fn product(nombre: &str, marca: &str, id_usuario: Option<f64>) -> NewProduct {
    NewProduct {
        id_usuario,
        nombre: nombre.to_string(),
        marca: marca.to_string(),
        tipo: "Eléctrica".to_string(),
        cuerpo: "Sólido".to_string(),
        alto: 98.0,
        ancho: 32.0,
        precio: 549_990.0,
        foto: format!("{}.jpg", nombre.to_lowercase()),
        detalle: "Incluye estuche".to_string(),
        stock: 3.0,
        color: "Negro".to_string(),
    }
}

/// Complete, valid body for `POST /productos`
pub fn create_body() -> Value {
    json!({
        "id_usuario": 7,
        "nombre": "Telecaster",
        "marca": "Fender",
        "tipo": "Eléctrica",
        "cuerpo": "Sólido",
        "alto": 97.5,
        "ancho": 32,
        "precio": 899990,
        "foto": "https://cdn.example.com/tele.jpg",
        "detalle": "Pastillas single coil",
        "stock": 5,
        "color": "Butterscotch"
    })
}

pub fn app(repository: Arc<InMemoryProductRepository>) -> Router {
    create_router(AppState::new(repository, JwtService::new(SECRET)))
}

pub fn token_signed_with(secret: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "id": 7, "email": "vendedor@example.com" }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token should encode")
}

pub fn bearer() -> String {
    format!("Bearer {}", token_signed_with(SECRET))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub fn authorized_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .expect("request should build")
}

pub fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

/// Run one request through the router and decode the JSON response
pub async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes)?;
    Ok((status, body))
}
