//! Product catalog HTTP service
//!
//! CRUD-style product endpoints over PostgreSQL with a bearer-token guard on
//! the write routes. [`routes::create_router`] builds the full application
//! from an [`AppState`].

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
