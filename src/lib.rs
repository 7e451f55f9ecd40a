// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod frequency;
pub mod logging;
pub mod persistence;
pub mod report;
pub mod tabular;

pub use crate::core::engine::DecipherEngine;
pub use crate::error::{TableError, XlitError};
