//! Mock ERP integration backend: farmer, sales order, delivery document and
//! delivery proof endpoints with sequential external-code allocation.

pub mod auth;
pub mod codegen;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod sweeper;

pub use codegen::{spawn_allocator, AllocatorHandle, CodeAllocator, CodeField, PgCodeStore};
pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use response::{paginated, Paginated, PaginationInfo};
pub use routes::{common::common_routes, erp_routes};
pub use state::AppState;
pub use store::{ensure_tables, seed_products};
pub use sweeper::spawn_sweeper;
