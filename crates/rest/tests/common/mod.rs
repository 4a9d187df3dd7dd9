//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server construction
//! - [`fixtures`] - Test documents

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
