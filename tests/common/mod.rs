//! Shared helpers for the integration tests.
//!
//! Repositories are created with the real `git` binary so every test runs
//! against the same adapter the CLI uses.

#![allow(dead_code)]

pub mod assertion_helpers;
pub mod git_fixtures;
