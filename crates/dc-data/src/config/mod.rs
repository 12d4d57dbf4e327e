//! Catalog configuration

pub mod catalog_config;

pub use catalog_config::*;
