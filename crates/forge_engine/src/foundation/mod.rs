//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types for transforms
//! - Frame and fixed-step timing
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
