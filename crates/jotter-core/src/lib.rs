//! jotter-core - Core library for Jotter
//!
//! This crate contains the note model, the backend clients (identity provider
//! and document store), and the note list synchronizer that keeps a locally
//! held list in step with the remote collection.

pub mod auth;
pub mod config;
pub mod confirm;
pub mod editor;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;
pub mod util;

#[cfg(test)]
mod testing;

pub use error::{DeleteError, Error, FetchError, Result, SaveError};
pub use models::{Note, NoteDocument, NoteId};
