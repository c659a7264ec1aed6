//! Tunable constants for an editing session.

/// Default hit radius around anchors.
pub const ANCHOR_RADIUS: f64 = 8.0;
/// Default hit radius around handles.
pub const HANDLE_RADIUS: f64 = 6.0;
/// Default horizontal distance between a new anchor and each of its handles.
pub const HANDLE_OFFSET: f64 = 20.0;
/// Default number of samples per discretized segment.
pub const SAMPLES: usize = 100;

/// Configuration for an [`Editor`](crate::editor::Editor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorConfig {
    /// Hit-test radius for anchors.
    pub anchor_radius: f64,
    /// Hit-test radius for handles.
    pub handle_radius: f64,
    /// Initial handle placement: handles start at `anchor ± (offset, 0)`.
    pub handle_offset: f64,
    /// Points per segment polyline.
    pub samples: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            anchor_radius: ANCHOR_RADIUS,
            handle_radius: HANDLE_RADIUS,
            handle_offset: HANDLE_OFFSET,
            samples: SAMPLES,
        }
    }
}
