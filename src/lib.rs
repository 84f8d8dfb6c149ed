//! GPS map-camera overlay backend.
//!
//! Takes a user photo, cover-fits it onto a fixed portrait canvas and stamps
//! a location panel, map thumbnail and branding badge over it, returning the
//! result as JPEG. The compositor itself is deterministic: callers inject
//! the random generator behind the coordinate jitter and the clock behind
//! the timestamp line.

pub mod api;
pub mod assets;
pub mod openapi;
pub mod overlay;
pub mod perf;

pub use crate::overlay::canvas::FontSet;
pub use crate::overlay::content::{Clock, OverlayContent, SystemClock};
pub use crate::overlay::{compose, render, OverlayError};
