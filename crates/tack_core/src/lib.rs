//! Core domain logic for tack.
//! This crate owns the tack file format and every business invariant.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{TackConfig, TACK_HOME_ENV, TACK_LOG_ENV};
pub use logging::{default_log_level, init_logging};
pub use model::tack::{
    CompletionOutcome, LocatedTack, Tack, TackId, TackKind, TackStateError,
};
pub use repo::tack_repo::{Completion, JsonTackRepository, RepoError, RepoResult, TackRepository};
pub use service::board::{
    BoardQuery, BoardSection, BoardSummary, BoardView, TackCounts, DEFAULT_STALE_DAYS,
};
pub use service::tack_service::{ServiceError, TackService};
pub use store::{open_store, DirectoryGroup, StoreError, StoreResult, TackDocument, TackStore};

/// Opens the store at `config.store_path` and wraps it in a service.
pub fn open_service(config: &TackConfig) -> StoreResult<TackService<JsonTackRepository>> {
    let store = open_store(&config.store_path)?;
    Ok(TackService::new(JsonTackRepository::new(store)))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
