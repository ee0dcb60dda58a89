//! Inbound WhatsApp webhook transport.
//!
//! Receives Cloud-API style payloads over HTTP, extracts the text messages,
//! and feeds each one to the interpreter. The transport contract is
//! best-effort: the payload is acknowledged with a fixed `{"status":"ok"}`
//! regardless of per-message outcomes.

pub mod batch;
pub mod payload;
pub mod server;
