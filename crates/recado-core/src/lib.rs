//! Core domain + application logic for the WhatsApp command interpreter.
//!
//! This crate is intentionally framework-agnostic. The HTTP webhook and the
//! Supabase storage backend live behind ports (traits) implemented in adapter
//! crates.

pub mod config;
pub mod datetime;
pub mod domain;
pub mod errors;
pub mod grammar;
pub mod interpreter;
pub mod logging;
pub mod ports;

pub use errors::{Error, Result};
