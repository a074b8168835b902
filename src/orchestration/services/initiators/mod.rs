//! Backend bring-up strategies, one per backend kind.
//!
//! Each initiator accepts only an [`crate::orchestration::domain::ActiveBackend`],
//! so skipped backends can never reach it.

mod cache;
mod document;
mod entity_sql;
mod sync_sql;

pub use cache::CacheInitiator;
pub use document::DocumentInitiator;
pub use entity_sql::{EntitySqlInitiator, EntitySqlModels};
pub use sync_sql::{SyncSqlInitiator, SyncSqlModels};
