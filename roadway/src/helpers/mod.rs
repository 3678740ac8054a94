//! Helpers for request path normalization and response generation.

pub mod http;
