//! HTTP API: configuration, routing, and the authorization gate wiring.

pub mod app;
pub mod authz;
pub mod config;
pub mod middleware;
