//! HTTP API

pub mod analyze;
pub mod cors;
pub mod error;
pub mod health;
pub mod index;
pub mod openapi;
