//! Core types and shared functionality for pdfscout.
//!
//! This crate provides:
//! - The adapter value model and its JSON persistence
//! - Unified error types
//! - Configuration structures

pub mod adapter;
pub mod config;
pub mod error;

pub use adapter::{Adapter, AdapterCollection, Strategy, StrategyKind};
pub use config::AppConfig;
pub use error::Error;
