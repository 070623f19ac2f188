//! Session controller.
//!
//! Owns the single-logout gate. The gate only ever moves from open to
//! closed; a fresh controller is the only way to reopen it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Sends the user back to the login entry point.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Redirect that only records the event in the log.
#[derive(Debug, Clone)]
pub struct LogRedirect {
    login_path: String,
}

impl LogRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self) {
        tracing::error!(login = %self.login_path, "Session expired, login required");
    }
}

/// Process-wide session state shared by every request client.
pub struct SessionController {
    logged_out: AtomicBool,
    redirect: Arc<dyn LoginRedirect>,
}

impl SessionController {
    pub fn new(redirect: Arc<dyn LoginRedirect>) -> Self {
        Self {
            logged_out: AtomicBool::new(false),
            redirect,
        }
    }

    /// Close the gate and redirect, once. Returns `true` only for the call
    /// that performed the redirect.
    pub fn try_trigger_logout(&self) -> bool {
        let won = self
            .logged_out
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            metrics::record_logout();
            self.redirect.redirect_to_login();
        } else {
            tracing::debug!("Logout already triggered, skipping redirect");
        }
        won
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("logged_out", &self.is_logged_out())
            .finish()
    }
}
