//! Common types and utilities for the jspy transpiler.
//!
//! This crate provides foundational types used across all jspy crates:
//! - Source spans (`Span`) as byte offsets into the original source
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;
