//! Hit testing and the drag state machine.

use crate::{point::Point2, store::AnchorStore};

/// Return the index of the first candidate whose circle of `radius` contains
/// `point`.
///
/// Containment is strict: a point exactly on the circle boundary does not hit.
pub fn hit_test<I>(point: Point2, candidates: I, radius: f64) -> Option<usize>
where
    I: IntoIterator<Item = Point2>,
{
    let r2 = radius * radius;
    candidates
        .into_iter()
        .position(|c| c.distance_squared(point) < r2)
}

/// An entity that can be picked and dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Anchor by index.
    Anchor(usize),
    /// Handle by flat index.
    Handle(usize),
}

/// Pick the entity under `point`.
///
/// Handles are tested before anchors, in flat index order, so a handle marker
/// overlapping an anchor marker always wins.
pub fn pick(
    store: &AnchorStore,
    point: Point2,
    anchor_radius: f64,
    handle_radius: f64,
) -> Option<Target> {
    hit_test(point, store.handle_positions(), handle_radius)
        .map(Target::Handle)
        .or_else(|| hit_test(point, store.anchor_positions(), anchor_radius).map(Target::Anchor))
}

/// The editor's selection state. At most one entity is ever being dragged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    /// Nothing is selected.
    #[default]
    Idle,
    /// An anchor is being dragged.
    DraggingAnchor(usize),
    /// A handle is being dragged.
    DraggingHandle(usize),
}

impl DragState {
    /// The state entered when an interaction starts on `target`.
    pub const fn grab(target: Target) -> Self {
        match target {
            Target::Anchor(i) => Self::DraggingAnchor(i),
            Target::Handle(i) => Self::DraggingHandle(i),
        }
    }

    /// The entity being dragged, if any.
    pub const fn target(self) -> Option<Target> {
        match self {
            Self::Idle => None,
            Self::DraggingAnchor(i) => Some(Target::Anchor(i)),
            Self::DraggingHandle(i) => Some(Target::Handle(i)),
        }
    }

    /// Whether nothing is selected.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
