//! CLI library for testing purposes

pub mod source;

pub use source::{Location, load_inputs};
