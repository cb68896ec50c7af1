//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`match_tree`] - Assembly of the match-annotated boundary tree
//! - [`geometry`] - GeoJSON feature building and coordinate counting
//! - [`import`] - Parsing of boundary import files
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod geometry;
pub mod import;
pub mod match_tree;
pub mod repositories;
