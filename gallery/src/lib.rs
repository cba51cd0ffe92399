//! Personal image gallery client
//!
//! Mediates between UI intent (sign in, sign out, upload, delete, view) and
//! two external services: a passwordless identity provider and a bucket-based
//! object store. Every object a session touches lives under that session's
//! own `{user_identifier}/` prefix.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod cdn;
mod manager;
mod notice;
mod state;
mod types;

pub use cdn::PublicUrlResolver;
pub use manager::{GalleryManager, IMAGES_BUCKET};
pub use notice::{Notice, NoticeSink, Severity};
pub use state::GalleryState;
pub use types::{Environment, GalleryError, GalleryResult};
