//! Giftly Core - Shared types and pricing engines.
//!
//! This crate provides the domain types and the pure computations used by
//! every Giftly component:
//! - `server` - JSON API for registries, checkout promos and administration
//! - `cli` - Command-line tools for migrations, tokens and reports
//!
//! # Architecture
//!
//! The core crate contains no I/O: no database access, no HTTP clients, no
//! clocks. Callers fetch rows and pass in "now", which keeps every engine
//! deterministic and testable with fixed inputs.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, emails and statuses
//! - [`promo`] - Promo code parsing and discount evaluation
//! - [`analytics`] - Admin dashboard aggregation over fetched rows
//! - [`payout`] - Vendor payout statements net of platform commission

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod payout;
pub mod promo;
pub mod types;

pub use types::*;
