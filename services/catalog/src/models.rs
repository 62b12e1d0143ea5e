//! API models for request and response payloads

pub mod product;

pub use product::{CreateProductRequest, InvalidProduct, NewProduct, Product, UpdateStockRequest};
