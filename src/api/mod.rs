//! API module for HTTP endpoints
//!
//! This module exposes the snapshot store to the Idea Flow frontend over REST.

pub mod http;
pub mod rest;
pub mod state;
