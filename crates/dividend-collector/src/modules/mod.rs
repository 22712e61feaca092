//! 수집 모듈.

pub mod dividend_sync;

pub use dividend_sync::{run_cycle, PgSyncBackend, SyncBackend};
