//! HTML template rendering handlers for the web dashboard.

mod aliases;
mod login;
mod org;

pub use aliases::{MISSING_COUNTRY_REDIRECT, aliases_handler};
pub use login::login_handler;
pub use org::org_handler;
