//! Common utilities, constants, and resources used across the mimir codebase.
//!
//! This crate provides shared functionality for the mimir toolkit: hex and string
//! helpers used at the transport boundary, small file-system helpers, and the
//! regular expressions used when parsing type and signature text.

/// Constants used throughout the mimir codebase.
pub mod constants;

/// General utility functions and types for common tasks.
pub mod utils;
