//! HTTP handlers, one module per resource.

pub mod health;
pub mod index;
pub mod sessions;
pub mod video_feed;
