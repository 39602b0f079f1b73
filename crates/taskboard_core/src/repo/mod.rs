//! Repository contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the durable storage contracts the services depend on.
//! - Keep SQL details out of the board store and the services.
//!
//! # Invariants
//! - SQLite repositories refuse connections that are not fully migrated.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod board_repo;
pub mod notification_repo;
