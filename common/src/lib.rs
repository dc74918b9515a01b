//! Shared audit model and logic.
//!
//! This crate holds everything the audit service and its clients agree on:
//!
//! - `model`: templates, audit instances, the image attachment map and the
//!   snapshot bundle, with their JSON wire format.
//! - `audit`: deriving instances from templates, capturing answers,
//!   scoring, saving templates through a gateway and exporting results.
//! - `ids`: the identifier generators injected into derivation and capture.
//! - `requests`: request payloads for the HTTP API.
//! - `error`: the error kinds surfaced to users.

pub mod audit;
pub mod error;
pub mod ids;
pub mod model;
pub mod requests;
