//! Shared application state for all routes.

use crate::codegen::{AllocatorHandle, CodeAllocator};
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Queue handle for background code assignments.
    pub allocator: AllocatorHandle,
    /// Direct allocator access for codes minted inline at insert time.
    pub codes: Arc<CodeAllocator>,
}
