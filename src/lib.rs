//! Asset lifecycle and transaction ledger core for a correctional-education
//! asset management program.
//!
//! Tracks laptops, books, calculators, and their bundled accessories as
//! they are issued to and returned from incarcerated individuals,
//! employees, and locations, backed by an append-only transaction ledger.
//! The GUI, PDF rendering, and signature hardware are external
//! collaborators consumed through the traits in [`printing`].
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod barcode;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod migrator;
pub mod printing;
pub mod services;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, ServiceError};
