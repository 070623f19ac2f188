//! Session lifecycle.
//!
//! # Data Flow
//! ```text
//! RequestClient sees an unrecoverable 401
//!     → TokenStore::clear()
//!     → SessionController::try_trigger_logout()
//!     → first caller wins the compare-and-set → LoginRedirect
//!     → later callers observe the closed gate and do nothing
//! ```

pub mod controller;

pub use controller::{LogRedirect, LoginRedirect, SessionController};
