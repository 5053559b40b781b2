//! Custom middleware and extractors.

pub mod auth;
