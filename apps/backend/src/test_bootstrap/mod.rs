#![cfg(test)]

//! Shared initialization for unit and integration tests.

pub mod logging;
