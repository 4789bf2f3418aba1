//! Error types and error handling for the front-end.
//!
//! This module defines the error types used throughout annotation
//! parsing, resolution, and validation. It includes:
//!
//! - Error structures with source span information
//! - Specific error variants for each compilation failure
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
