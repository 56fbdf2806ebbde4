//! Container dashboard HTTP server
//!
//! Exposes container inventory, start/stop controls and cost-saving
//! suggestions over a JSON API backed by the local Docker daemon.

pub mod api;
pub mod config;
