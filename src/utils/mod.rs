//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Base-62 short code generation and alias validation
//! - [`url_validator`] - URL validation, loop rejection and scheme upgrade
//! - [`client_ip`] - Client identifier extraction from the request

pub mod client_ip;
pub mod code_generator;
pub mod url_validator;
