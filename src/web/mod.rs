//! Web dashboard layer for browser-based UI.
//!
//! Provides the login page, the organization page and the alias editor. Uses
//! Askama templates for server-side rendering; the editor itself talks to the
//! tree and geometry routes mounted under `/dashboard`.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie authentication
//! - [`routes`] - Dashboard route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
