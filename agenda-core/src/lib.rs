//! Client-side state for the agenda calendar app.
//!
//! This crate provides the two stores a UI reads from and dispatches to:
//! - `auth` for the session (login, registration, token check, logout)
//! - `calendar` for the in-memory event collection and the selected event

pub mod agenda;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod storage;

pub use agenda::Agenda;
pub use error::{AgendaError, AgendaResult};
