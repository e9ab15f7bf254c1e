//! Shared utilities and common types for the wedding site backend.
//!
//! This crate provides functionality used across the other crates:
//! - Guest input validation (names, contact addresses, media types)
//! - CSV field escaping and row splitting for exports

pub mod csv;
pub mod validation;
