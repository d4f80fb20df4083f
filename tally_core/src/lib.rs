#![forbid(unsafe_code)]

//! Core state and computation for the Tally dashboard.
//!
//! This crate provides:
//! - Domain types (drink events, reminder state, status tiers)
//! - The drink menu and its milestones
//! - Persistence (drink log, reminder file, CSV archive)
//! - The Widmark decay estimate
//! - Breakpoint classification into status tiers
//! - Per-request view recomputation

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
mod persist;
pub mod event_log;
pub mod reminder;
pub mod decay;
pub mod classify;
pub mod milestones;
pub mod archive;
pub mod dashboard;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_menu, DrinkMenu, DrinkPreset};
pub use config::Config;
pub use event_log::EventLogStore;
pub use reminder::ReminderCache;
pub use classify::{Bound, Breakpoint, BreakpointTable};
pub use milestones::{milestones_reached, Milestone};
pub use archive::archive_events;
pub use dashboard::{alcohol_view, reminder_view, AlcoholView, DashboardContext, ReminderView};
