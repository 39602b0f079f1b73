//! Core use-case services.
//!
//! # Responsibility
//! - Pair the in-memory board and the notification generator with their
//!   storage collaborators.
//! - Keep hosts decoupled from storage details.

pub mod board_service;
pub mod notification_service;
