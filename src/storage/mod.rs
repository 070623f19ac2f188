//! Client-side persistence.
//!
//! # Data Flow
//! ```text
//! kv.rs (KeyValueStore: MemoryStore | FileStore)
//!     → tokens.rs (access + refresh token, read on every request)
//!     → preferences.rs (last budget, theme, currency, dashboard layout)
//! ```
//!
//! # Design Decisions
//! - Every key is read and written independently; last writer wins
//! - Token reads never fail; unavailable storage means "no token"

pub mod kv;
pub mod preferences;
pub mod tokens;

pub use kv::{open_store, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use preferences::{Preferences, Theme, WidgetLayout};
pub use tokens::TokenStore;
