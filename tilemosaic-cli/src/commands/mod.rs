//! CLI command implementations.

pub mod common;
pub mod data;
pub mod tile;
pub mod view;
