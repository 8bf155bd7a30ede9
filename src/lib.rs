//! Identity service for the order-management backend: signup, signin and a
//! token-gated profile lookup over a pluggable credential store.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
