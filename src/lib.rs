//! Browser-side backend for a genre-driven movie recommender.
//!
//! The core is the genre selection rules ([`services::selection`]) and the
//! single-flight query lifecycle ([`services::query_executor`]). The
//! [`api`] module exposes both to a browser UI over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
