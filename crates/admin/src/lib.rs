//! Inkpress Admin library.
//!
//! This crate provides the administrative backend as a library, allowing it
//! to be tested and reused by the CLI.
//!
//! # Security
//!
//! This crate manages team accounts, role assignment, and the full customer,
//! order, product, and design collections. Only deploy behind the internal
//! network boundary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
