//! promptdock-core: platform-agnostic logic for the decorator overlay widget.
//!
//! This crate provides:
//! - geometry for default placement, edge docking, and panel positioning
//! - `DragMachine` - the click/drag/dock pointer state machine
//! - the decorator source parser and its built-in fallback
//! - `WidgetConfig` and the `ConfigStore` persistence boundary
//! - `TextSurface` - capability trait over host text-entry surfaces
//! - the bulk/typed injection engine with resumable `TypingSession`
//!
//! Everything here is testable natively; the DOM lives in
//! `promptdock-browser`.

pub mod config;
pub mod decorators;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod state;
pub mod surface;
pub mod typing;

pub use config::{ConfigStore, StoredConfig, UNSET, WidgetConfig, default_visible, storage_key};
pub use decorators::{DEFAULT_SOURCE_URL, DecoratorEntry, FALLBACK_SOURCE, parse_decorators};
pub use drag::{CLICK_WINDOW, DRAG_THRESHOLD, DragEnd, DragMachine, DragSession};
pub use error::WidgetError;
pub use geometry::{
    EDGE_MARGIN, Point, Rect, Size, Viewport, default_position, dock_position, panel_position,
};
pub use smol_str::SmolStr;
pub use state::WidgetState;
pub use surface::{InsertUnsupported, SurfaceKind, TextSurface};
pub use typing::{
    InsertPlan, TYPING_INTERVAL_MS, TickOutcome, TypingSession, begin_typed_insert, insert_bulk,
    plan_typed_insert,
};
pub use web_time::Instant;
