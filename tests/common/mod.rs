//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - An in-memory scripted backend that journals every document operation
//! - printpdf fixtures for real documents
//! - Assertions over redacted output

#![allow(dead_code)]

pub mod assertions;
pub mod backend;
pub mod fixtures;

pub use assertions::*;
pub use backend::*;
pub use fixtures::*;
