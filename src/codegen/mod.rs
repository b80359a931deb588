//! Sequential external-code generation: format policy, storage seam,
//! allocator, and the background queue that runs it.

mod allocator;
mod format;
mod store;
mod worker;

pub use allocator::CodeAllocator;
pub use format::{parse_suffix, CodeField};
pub use store::{CodeStore, PgCodeStore};
pub use worker::{spawn_allocator, AllocationJob, AllocatorHandle};
