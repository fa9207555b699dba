//! Repository layer over the tack store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep file persistence details out of the service layer.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `NotATodo`) in
//!   addition to storage errors.

pub mod tack_repo;
