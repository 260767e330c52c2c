//! Common library exports shared between the engine and its consumers.

extern crate serde;


pub mod record;
pub mod catalog_config;
pub mod search_query;
pub mod search_result;
pub mod load_report;
