//! Integration tests for the refactoring engine through its public API.

mod scenarios;
mod workspace;
