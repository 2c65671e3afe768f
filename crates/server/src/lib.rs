//! Giftly API server library.
//!
//! The binary in `main.rs` wires these modules into an axum server; the CLI
//! reuses the configuration, database repositories and token hashing.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
