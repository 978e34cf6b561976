//! REST API module for the context service
//!
//! Serves `/get_context` plus status endpoints over axum. Response and
//! request types carry schemars annotations so `/api` can publish them.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod startup;
pub mod types;
