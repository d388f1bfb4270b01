//! tripgen library
//!
//! Exposes the app state, API clients and rendering for the binary and for
//! integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod logging;
pub mod ui;
pub mod worker;
