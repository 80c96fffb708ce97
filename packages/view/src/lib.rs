#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View synchronization for the disaster map.
//!
//! Keeps the map markers, the sidebar cards and the legend consistent with
//! a single in-memory [`store::ReportStore`] and a mutable
//! [`filter::FilterState`]. The pieces are wired together by [`app::App`],
//! which owns every component and the display surfaces and reacts to typed
//! [`app::ViewEvent`]s.
//!
//! Data flow:
//!
//! ```text
//! ReportApi ──list──▶ ReportStore ──┐
//!                                   ├─▶ RenderEngine ──▶ MapSurface / SidebarSurface
//!                      FilterState ─┘
//! FormController ──create──▶ ReportApi, then refresh ▶ render ▶ close
//! ```

pub mod app;
pub mod dashboard;
pub mod filter;
pub mod form;
pub mod memory;
pub mod render;
pub mod store;
pub mod surface;

pub use app::{App, Surfaces, ViewEvent};
pub use surface::{MapSurface, Notifier, SidebarSurface};
