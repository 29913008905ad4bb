//! Utility functions

pub mod browser;
pub mod format;
