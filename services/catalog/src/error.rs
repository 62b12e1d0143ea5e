//! Error types for the catalog service
//!
//! Every handler failure is an [`ApiError`]: a small closed set of kinds that
//! decide the HTTP status, each carrying the JSON body shape the caller sees.
//! Which shape a handler uses for infrastructure failures is fixed per
//! operation in [`Operation::store_failure`].

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::{Value, json};
use thiserror::Error;

use crate::models::InvalidProduct;

pub const TOKEN_MISSING: &str = "No autorizado. Token no presente.";
pub const TOKEN_INVALID: &str = "No autorizado. Token inválido.";
pub const REQUIRED_FIELDS_EMPTY: &str = "Los campos obligatorios no pueden estar vacíos.";
pub const PRODUCT_ID_NOT_FOUND: &str =
    "No se encontró el producto con ese ID o el formato es incorrecto.";
pub const USER_PRODUCTS_NOT_FOUND: &str = "No se encontraron productos para este usuario.";
pub const STOCK_FIELDS_MISSING: &str = "Faltan datos obligatorios";
pub const STOCK_QUANTITY_INVALID: &str = "Cantidad debe ser un número válido";
pub const STOCK_PRODUCT_NOT_FOUND: &str = "Producto no encontrado";

/// JSON body shape of an error response
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// `{"error": ...}`
    Error(String),
    /// `{"msg": ...}`
    Msg(String),
    /// `{"msg": ..., "error": ...}`
    MsgWithDetail { msg: String, detail: String },
}

impl ErrorBody {
    pub fn error(message: impl Into<String>) -> Self {
        ErrorBody::Error(message.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        ErrorBody::Msg(message.into())
    }

    fn to_json(&self) -> Value {
        match self {
            ErrorBody::Error(error) => json!({ "error": error }),
            ErrorBody::Msg(msg) => json!({ "msg": msg }),
            ErrorBody::MsgWithDetail { msg, detail } => json!({ "msg": msg, "error": detail }),
        }
    }
}

/// Custom error type for the catalog service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or rejected bearer token
    #[error("Unauthorized: {0:?}")]
    Unauthorized(ErrorBody),

    /// Malformed or incomplete client input
    #[error("Bad request: {0:?}")]
    BadRequest(ErrorBody),

    /// Lookup without a matching record
    #[error("Not found: {0:?}")]
    NotFound(ErrorBody),

    /// Data-access failure
    #[error("Internal server error: {0:?}")]
    Internal(ErrorBody),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> &ErrorBody {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::BadRequest(body)
            | ApiError::NotFound(body)
            | ApiError::Internal(body) => body,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body().to_json())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(ErrorBody::error(rejection.body_text()))
    }
}

impl From<InvalidProduct> for ApiError {
    fn from(invalid: InvalidProduct) -> Self {
        match invalid {
            InvalidProduct::MissingFields => {
                ApiError::BadRequest(ErrorBody::msg(REQUIRED_FIELDS_EMPTY))
            }
            field @ InvalidProduct::InvalidField { .. } => {
                ApiError::BadRequest(ErrorBody::error(field.to_string()))
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// The catalog operations, each with its own failure response contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListProducts,
    CreateProduct,
    GetProductById,
    GetProductsByUser,
    GetProductsByBrand,
    GetProductsByType,
    GetProductsByBody,
    GetLatestProducts,
    UpdateStock,
}

impl Operation {
    /// Map a data-access failure to this operation's 500 response.
    ///
    /// Some operations echo the driver message back to the caller and some
    /// don't; clients rely on the exact shapes, so they are kept per
    /// operation rather than unified.
    pub fn store_failure(self, err: &DatabaseError) -> ApiError {
        let detail = err.message();
        let body = match self {
            Operation::ListProducts => ErrorBody::error("Error al obtener los productos."),
            Operation::CreateProduct => ErrorBody::error("Error interno del servidor."),
            Operation::GetProductById => ErrorBody::MsgWithDetail {
                msg: "Error interno del servidor.".to_string(),
                detail,
            },
            Operation::GetProductsByUser => ErrorBody::MsgWithDetail {
                msg: "Error al obtener productos del usuario.".to_string(),
                detail,
            },
            Operation::GetProductsByBrand => ErrorBody::MsgWithDetail {
                msg: "Error al obtener productos por marca.".to_string(),
                detail,
            },
            Operation::GetProductsByType => ErrorBody::MsgWithDetail {
                msg: "Error al obtener productos por tipo.".to_string(),
                detail,
            },
            Operation::GetProductsByBody => ErrorBody::MsgWithDetail {
                msg: "Error al obtener productos por cuerpo.".to_string(),
                detail,
            },
            Operation::GetLatestProducts => ErrorBody::msg("Error al obtener los productos"),
            Operation::UpdateStock => ErrorBody::Error(detail),
        };

        ApiError::Internal(body)
    }
}
