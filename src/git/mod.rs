//! Git operations on the local checkout.
//!
//! Used to infer which remote repository a command targets and to point remotes at
//! a repository's new location after it has been renamed.

mod remote;

pub use remote::*;
