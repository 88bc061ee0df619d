//! Mitmachen search widget
//!
//! A topic search that finds articles in need of attention, pages through
//! them, and suggests topics when there is nothing to show. The widget core
//! (controller, renderers, tracker) is host-agnostic; `tui` hosts it in a
//! terminal.

pub mod api;
pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod controller;
pub mod event;
pub mod labels;
pub mod logging;
pub mod model;
pub mod render;
pub mod tracker;
pub mod tui;

pub use controller::{ControllerOptions, SearchController};
