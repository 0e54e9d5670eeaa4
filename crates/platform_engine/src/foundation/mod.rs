//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and sign helpers
//! - The scaled simulation clock
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
