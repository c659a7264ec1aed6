//! Core library for editing and evaluating anchor-and-handle Bézier curves.
//!
//! The engine is split into a point/handle [`store`], the selection state
//! machine in [`select`], the segment [`compose`]r and the De Casteljau
//! evaluator in [`bezier`]. [`editor::Editor`] ties them together into a
//! single-threaded editing session driven by input events.
//!
//! # Curve modes
//!
//! - Composite ("N-Bezier")
//! - Segmented ("MultiplyBezier")
//! - Single (one full-degree Bézier over the whole control chain)
//!
//! The crate also carries a Poisson-disk sampler in [`poisson`], which is an
//! independent component and shares nothing with the curve engine beyond the
//! point type.

/// De Casteljau evaluation and discretization.
pub mod bezier;
/// Segment composition for each curve mode.
pub mod compose;
/// Editor configuration constants.
pub mod config;
/// Event-driven editing session.
pub mod editor;
/// Error types used across the crate.
pub mod error;
/// Two-dimensional points and helpers.
pub mod point;
/// Blue-noise point sampling over a rectangle.
pub mod poisson;
/// Central registry of curve mode metadata.
pub mod registry;
/// Hit testing and drag state.
pub mod select;
/// The anchor and handle store.
pub mod store;

pub use crate::{
    bezier::{discretize, evaluate},
    compose::{CurveMode, Segment, compose},
    config::EditorConfig,
    editor::{Editor, Event, Frame, Surface},
    point::Point2,
    store::AnchorStore,
};

/// Look up a curve mode by its registry key or display name.
///
/// Returns an error if the name is unknown.
pub fn mode_from_name(name: &str) -> error::Result<CurveMode> {
    registry::lookup(name)
}
