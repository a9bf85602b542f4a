//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `github`: the `RepoApi` seam and its client for the GitHub REST API.

mod github;

pub use github::*;
