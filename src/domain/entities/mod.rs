//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the algorithms operating on them live in
//! [`crate::domain::match_tree`], [`crate::domain::geometry`] and the
//! application services.
//!
//! # Entity Types
//!
//! - [`Boundary`] - A node of the administrative tree
//! - [`BoundaryAlias`] - An organization's alternate name for a boundary
//! - [`Organization`] - An alias-owning organization
//! - [`SyncPayload`] - A parsed alias synchronization request
//!
//! `NewBoundary` is the creation counterpart used by the admin import, and
//! `BoundarySummary` the listing projection.

pub mod alias;
pub mod boundary;
pub mod organization;
pub mod sync_payload;

pub use alias::{BoundaryAlias, join_aliases, parse_alias_blob};
pub use boundary::{Boundary, BoundaryLevel, BoundarySummary, NewBoundary};
pub use organization::{OrgContext, Organization};
pub use sync_payload::{SyncChild, SyncEntry, SyncPayload};
