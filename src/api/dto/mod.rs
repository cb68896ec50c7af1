//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Tree and geometry responses are produced directly by
//! the domain ([`crate::domain::match_tree::MatchNode`], GeoJSON values).

pub mod boundary;
pub mod boundary_list;
pub mod health;
pub mod pagination;
