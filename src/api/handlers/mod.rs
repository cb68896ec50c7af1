//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints. The
//! tree and geometry handlers are shared with the dashboard.

pub mod boundaries;
pub mod boundary_tree;
pub mod geometry;
pub mod health;

pub use boundaries::{alias_root_handler, boundary_list_handler};
pub use boundary_tree::{sync_tree_handler, tree_handler};
pub use geometry::geometry_handler;
pub use health::health_handler;
