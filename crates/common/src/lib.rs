//! Common types shared across the Feedback Collector crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for session token claims and constants
pub mod jwt;
