#![forbid(unsafe_code)]

//! Core domain model and business logic for FitLife.
//!
//! This crate provides:
//! - Domain types (workouts, medicines, todos, profile, AI advice)
//! - Recommendation engine and menu analyzer with deterministic fallbacks
//! - Reminder evaluation for scheduled medicines
//! - Generative text service client
//! - Persistence (JSONL logs, JSON documents, CSV export)
//! - Progress statistics

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod catalog;
pub mod llm;
pub mod prompt;
pub mod decode;
pub mod engine;
pub mod menu;
pub mod reminder;
pub mod journal;
pub mod history;
pub mod store;
pub mod audit;
pub mod export;
pub mod progress;
pub mod assistant;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use clock::{Clock, FixedClock, SystemClock};
pub use llm::{GenerationRequest, OpenAiClient, TextGenerator, UnavailableGenerator};
pub use engine::{least_worked_group, recommend};
pub use menu::analyze_menu;
pub use reminder::{due_reminders, todays_medicines, upcoming};
pub use store::{FileStore, FitnessStore};
pub use audit::{AuditSink, JsonlAuditLog};
pub use assistant::Assistant;
