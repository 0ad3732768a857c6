//! Arena management
//!
//! An arena is a directory tree rooted at (or below) a directory named
//! `arena.union`. Initializing it creates `config/` and `archives/`;
//! activating it verifies that state and refreshes the remote cache when
//! `config/sources.list` changed since the last consistent point.

pub mod controller;
pub mod detect;
pub mod identity;
pub mod layout;
pub mod locate;
pub mod lock;
pub mod path;

pub use controller::{Arena, ArenaSettings, ArenaStatus};
pub use detect::{ChangeDetector, Freshness};
pub use identity::{CacheId, CacheIdGenerator};
pub use layout::ArenaLayout;
pub use locate::{is_arena, locate, ArenaLocation, ArenaRoot, ARENA_MARKER};
pub use lock::ArenaLock;
pub use path::resolve_path;
