//! Services that sit between routes and the database.

pub mod tokens;
