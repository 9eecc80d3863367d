//! Foundation module - Core utilities and types
//!
//! This module provides small utilities used throughout the engine:
//! - Frame timing
//! - Logging setup

pub mod time;
pub mod logging;
