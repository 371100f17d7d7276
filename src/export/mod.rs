//! Exporters over a resolved system snapshot.

mod json;

pub use json::{to_json, write_json};
