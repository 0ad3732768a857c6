//! Chanko - package arena manager
//!
//! Locates `arena.union` arenas, initializes their on-disk state and keeps
//! their package caches in step with `config/sources.list`.

pub mod arena;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use error::{ChankoError, ChankoResult};
