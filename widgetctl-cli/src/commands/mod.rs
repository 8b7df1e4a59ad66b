//! Command implementations for widgetctl CLI

pub mod serve;

pub use serve::{run_init_schema, run_serve};
