//! Browser DOM layer for the promptdock overlay widget.
//!
//! This crate provides the DOM-facing half of the widget: surface
//! discovery and adapters, localStorage persistence, the remote
//! decorator-source fetch, and the overlay itself. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `locator`: find the host page's prompt surface
//! - `surface`: `TextSurface` adapter over textarea/input/contenteditable
//! - `storage`: per-hostname widget config in localStorage
//! - `fetch`: decorator source download with fallback
//! - `inject`: timer-driven character typing task
//! - `widget`: shadow-DOM overlay with drag, dock, panel, and toast
//!
//! # Re-exports
//!
//! This crate re-exports `promptdock-core` for convenience, so consumers
//! only need to depend on `promptdock-browser`.

// Re-export core crate
pub use promptdock_core;
pub use promptdock_core::*;

pub mod fetch;
pub mod inject;
pub mod locator;
pub mod storage;
pub mod surface;
pub mod widget;

pub use fetch::fetch_decorator_source;
pub use inject::TypingTask;
pub use locator::{SURFACE_SELECTORS, locate};
pub use storage::LocalConfigStore;
pub use surface::DomSurface;
pub use widget::{HOST_ID, MountError, OverlayWidget, TOGGLE_EVENT};
