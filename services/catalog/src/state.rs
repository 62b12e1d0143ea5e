//! Application state shared across handlers

use std::sync::Arc;

use crate::{jwt::JwtService, repositories::ProductRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub jwt_service: JwtService,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>, jwt_service: JwtService) -> Self {
        Self {
            products,
            jwt_service,
        }
    }
}
