//! Authentication primitives for the admin API surface.

pub mod jwt;
