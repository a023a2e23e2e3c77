//! proctop — a top-like process monitor for Linux.
//!
//! The sampling engine lives under [`system`]; [`scheduler`] decides when it
//! runs and hands each [`system::collector::Snapshot`] to the [`app::App`]
//! state that the [`ui`] draws.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod system;
pub mod ui;
