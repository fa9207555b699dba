//! Domain model for directory annotations.
//!
//! # Responsibility
//! - Define the tack record, its kinds and the todo lifecycle.
//!
//! # Invariants
//! - A tack never stores its directory; ownership is expressed by the
//!   store's directory groups.

pub mod tack;
