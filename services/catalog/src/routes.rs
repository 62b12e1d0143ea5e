//! Catalog service routes

use axum::{
    Extension, Json, Router, async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::error::DatabaseError;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    error::{
        ApiError, ApiResult, ErrorBody, Operation, PRODUCT_ID_NOT_FOUND, STOCK_FIELDS_MISSING,
        STOCK_PRODUCT_NOT_FOUND, STOCK_QUANTITY_INVALID, USER_PRODUCTS_NOT_FOUND,
    },
    jwt::Claims,
    middleware::validate_token,
    models::{CreateProductRequest, Product, UpdateStockRequest},
    validation::{is_truthy, parse_row_id, to_number, to_row_id},
};

/// How many products `GET /productos/ultimos` returns at most
pub const LATEST_PRODUCTS_LIMIT: i64 = 5;

/// JSON body extractor.
///
/// A request without a JSON content type, or with an empty body, reads as
/// `T::default()` so the handler answers with its own missing-field error.
/// Malformed JSON is a plain 400.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim_start().starts_with("application/json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(ErrorBody::error(rejection.body_text())))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiJson(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(ApiJson(value))
    }
}

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/productos", post(create_product))
        .route("/productos/usuario/:id_usuario", get(get_products_by_user))
        .route("/stock", put(update_stock))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            validate_token,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/productos", get(get_products))
        .route("/productos/ultimos", get(get_latest_products))
        .route("/productos/marca/:marca", get(get_products_by_brand))
        .route("/productos/tipo/:tipo", get(get_products_by_type))
        .route("/productos/cuerpo/:cuerpo", get(get_products_by_body))
        .route("/productos/:id", get(get_product_by_id))
        .merge(protected_routes)
        .with_state(state)
}

fn store_failure(operation: Operation, err: DatabaseError) -> ApiError {
    error!(?operation, "Data access failed: {}", err);
    operation.store_failure(&err)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog"
    }))
}

/// List every product
pub async fn get_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .find_all()
        .await
        .map_err(|e| store_failure(Operation::ListProducts, e))?;

    Ok(Json(products))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_product = payload.into_new_product()?;

    let product = state
        .products
        .insert(&new_product)
        .await
        .map_err(|e| store_failure(Operation::CreateProduct, e))?;

    let created_by = claims.as_ref().and_then(|Extension(c)| c.get("id").cloned());
    info!(
        id_producto = product.id_producto,
        ?created_by,
        "Product created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Producto creado con éxito!",
            "data": product,
        })),
    ))
}

/// Get a product by ID
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let not_found = || ApiError::NotFound(ErrorBody::msg(PRODUCT_ID_NOT_FOUND));

    let id = parse_row_id(&id).ok_or_else(not_found)?;
    let product = state
        .products
        .find_by_id(id)
        .await
        .map_err(|e| store_failure(Operation::GetProductById, e))?
        .ok_or_else(not_found)?;

    Ok(Json(product))
}

/// Get the products owned by a user
pub async fn get_products_by_user(
    State(state): State<AppState>,
    Path(id_usuario): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let not_found = || ApiError::NotFound(ErrorBody::msg(USER_PRODUCTS_NOT_FOUND));

    // A non-integer id cannot own rows, so it is answered like an empty result.
    let id_usuario = parse_row_id(&id_usuario).ok_or_else(not_found)?;
    let products = state
        .products
        .find_by_user(id_usuario)
        .await
        .map_err(|e| store_failure(Operation::GetProductsByUser, e))?;

    if products.is_empty() {
        return Err(not_found());
    }

    Ok(Json(products))
}

/// Get products by brand; an empty list is still a 200
pub async fn get_products_by_brand(
    State(state): State<AppState>,
    Path(marca): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .find_by_brand(&marca)
        .await
        .map_err(|e| store_failure(Operation::GetProductsByBrand, e))?;

    Ok(Json(products))
}

/// Get products by type
pub async fn get_products_by_type(
    State(state): State<AppState>,
    Path(tipo): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .find_by_type(&tipo)
        .await
        .map_err(|e| store_failure(Operation::GetProductsByType, e))?;

    Ok(Json(products))
}

/// Get products by body style
pub async fn get_products_by_body(
    State(state): State<AppState>,
    Path(cuerpo): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .find_by_body(&cuerpo)
        .await
        .map_err(|e| store_failure(Operation::GetProductsByBody, e))?;

    Ok(Json(products))
}

/// Get the most recently created products
pub async fn get_latest_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let mut products = state
        .products
        .find_latest(LATEST_PRODUCTS_LIMIT)
        .await
        .map_err(|e| store_failure(Operation::GetLatestProducts, e))?;

    products.truncate(LATEST_PRODUCTS_LIMIT as usize);

    Ok(Json(products))
}

/// Set the stock of a product
pub async fn update_stock(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateStockRequest>,
) -> ApiResult<impl IntoResponse> {
    // cantidad may be 0 or null; only a missing field is rejected.
    let (Some(id_producto), Some(cantidad)) =
        (payload.id_producto.filter(is_truthy), payload.cantidad)
    else {
        return Err(ApiError::BadRequest(ErrorBody::error(STOCK_FIELDS_MISSING)));
    };

    let cantidad = to_number(&cantidad)
        .ok_or_else(|| ApiError::BadRequest(ErrorBody::error(STOCK_QUANTITY_INVALID)))?;

    let not_found = || ApiError::NotFound(ErrorBody::error(STOCK_PRODUCT_NOT_FOUND));

    // Ids that are not integers cannot name a row; no query is issued.
    let id = to_row_id(&id_producto).ok_or_else(not_found)?;
    let product = state
        .products
        .set_stock(id, cantidad)
        .await
        .map_err(|e| store_failure(Operation::UpdateStock, e))?
        .ok_or_else(not_found)?;

    info!(id_producto = id, stock = product.stock, "Stock updated");

    Ok(Json(json!({
        "mensaje": "Stock actualizado correctamente",
        "producto": product,
    })))
}
