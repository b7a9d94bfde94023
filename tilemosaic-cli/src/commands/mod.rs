//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`bbox`] - Compute and print the tile grid for a set of points
//! - [`init`] - Write a default configuration file
//! - [`render`] - Render mosaics for a set of points

pub mod bbox;
pub mod common;
pub mod init;
pub mod render;
