//! HTTP handlers for the bouquet service.

pub mod generate;
pub mod health;
