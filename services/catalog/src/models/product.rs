//! Product models for the catalog service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::validation::{coerce_number, is_truthy, present, to_text};

/// Product record as stored in the `productos` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id_producto: i32,
    pub id_usuario: Option<i32>,
    pub nombre: String,
    pub marca: String,
    pub tipo: String,
    pub cuerpo: String,
    pub alto: f64,
    pub ancho: f64,
    pub precio: i32,
    pub foto: String,
    pub detalle: String,
    pub stock: i32,
    pub color: String,
}

/// Insert payload for a new product.
///
/// Numeric values stay as sent; the store rounds them into its integer
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id_usuario: Option<f64>,
    pub nombre: String,
    pub marca: String,
    pub tipo: String,
    pub cuerpo: String,
    pub alto: f64,
    pub ancho: f64,
    pub precio: f64,
    pub foto: String,
    pub detalle: String,
    pub stock: f64,
    pub color: String,
}

/// Request body for `POST /productos`
///
/// Fields stay raw until [`CreateProductRequest::into_new_product`]:
/// truthiness is judged on what the client sent, not on the coerced value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub id_usuario: Option<Value>,
    #[serde(default)]
    pub nombre: Option<Value>,
    #[serde(default)]
    pub marca: Option<Value>,
    #[serde(default)]
    pub tipo: Option<Value>,
    #[serde(default)]
    pub cuerpo: Option<Value>,
    #[serde(default)]
    pub alto: Option<Value>,
    #[serde(default)]
    pub ancho: Option<Value>,
    #[serde(default)]
    pub precio: Option<Value>,
    #[serde(default)]
    pub foto: Option<Value>,
    #[serde(default)]
    pub detalle: Option<Value>,
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub color: Option<Value>,
}

/// Why a create request cannot become a [`NewProduct`]
#[derive(Debug, Error, PartialEq)]
pub enum InvalidProduct {
    /// A required field is absent or falsy
    #[error("required fields are empty")]
    MissingFields,

    /// A field is present but cannot be stored in its column
    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: Value },
}

impl CreateProductRequest {
    fn required_fields(&self) -> [&Option<Value>; 11] {
        [
            &self.nombre,
            &self.marca,
            &self.tipo,
            &self.cuerpo,
            &self.alto,
            &self.ancho,
            &self.precio,
            &self.foto,
            &self.detalle,
            &self.stock,
            &self.color,
        ]
    }

    /// Whether every descriptive field is present and truthy.
    ///
    /// `id_usuario` is optional. A stock or price of `0` is rejected, `"0"`
    /// is not.
    pub fn has_required_fields(&self) -> bool {
        self.required_fields()
            .into_iter()
            .all(|field| field.as_ref().is_some_and(is_truthy))
    }

    /// Check the required fields, then coerce every field to its column type
    pub fn into_new_product(self) -> Result<NewProduct, InvalidProduct> {
        if !self.has_required_fields() {
            return Err(InvalidProduct::MissingFields);
        }

        Ok(NewProduct {
            id_usuario: optional_number("id_usuario", self.id_usuario)?,
            nombre: text("nombre", self.nombre)?,
            marca: text("marca", self.marca)?,
            tipo: text("tipo", self.tipo)?,
            cuerpo: text("cuerpo", self.cuerpo)?,
            alto: number("alto", self.alto)?,
            ancho: number("ancho", self.ancho)?,
            precio: number("precio", self.precio)?,
            foto: text("foto", self.foto)?,
            detalle: text("detalle", self.detalle)?,
            stock: number("stock", self.stock)?,
            color: text("color", self.color)?,
        })
    }
}

fn text(field: &'static str, value: Option<Value>) -> Result<String, InvalidProduct> {
    let value = value.unwrap_or_default();
    match to_text(&value) {
        Some(text) => Ok(text),
        None => Err(InvalidProduct::InvalidField { field, value }),
    }
}

fn number(field: &'static str, value: Option<Value>) -> Result<f64, InvalidProduct> {
    let value = value.unwrap_or_default();
    match coerce_number(&value) {
        Some(number) => Ok(number),
        None => Err(InvalidProduct::InvalidField { field, value }),
    }
}

fn optional_number(
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<f64>, InvalidProduct> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => number(field, Some(value)).map(Some),
    }
}

/// Request body for `PUT /stock`
///
/// Both fields are kept raw: `cantidad: null` must be told apart from a
/// missing `cantidad`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStockRequest {
    #[serde(default, deserialize_with = "present")]
    pub id_producto: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub cantidad: Option<Value>,
}
