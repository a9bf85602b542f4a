//! Defines the data structures and models used throughout the application.
//!
//! This covers repository identity, the validated rename request, and the
//! structures representing data exchanged with the GitHub API.

mod repo;

pub use repo::*;
