//! A single-threaded editing session.
//!
//! The [`Editor`] owns the anchor store, the active curve mode and the drag
//! state. Input events are applied one at a time; every event that changes
//! the geometry is followed by a full recomposition and re-evaluation of the
//! curve, which is handed to a [`Surface`] as a [`Frame`]. Nothing computed
//! for one frame is reused for the next.

use tracing::debug;

use crate::{
    bezier,
    compose::{self, CurveMode, Segment},
    config::EditorConfig,
    error::Result,
    point::Point2,
    select::{self, DragState, Target},
    store::AnchorStore,
};

/// Input events accepted by the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Primary press at a point: grab what is under it or add an anchor.
    InteractionStart(Point2),
    /// Pointer motion with the primary button held.
    InteractionMove(Point2),
    /// Primary release.
    InteractionEnd,
    /// Request to delete the anchor under a point.
    SecondaryAction(Point2),
    /// The composition mode was switched.
    CurveModeChanged(CurveMode),
}

/// What applying an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Unchanged,
    /// A new anchor was appended at this index.
    Inserted(usize),
    /// The anchor at this index was removed.
    Deleted(usize),
    /// The entity under the pointer was grabbed.
    Selected(Target),
    /// The dragged entity moved.
    Moved(Target),
    /// The drag ended.
    Released,
    /// The curve mode was set.
    ModeChanged,
}

impl Outcome {
    /// Whether the event changed anchors, handles or the mode, so the curve
    /// has to be rebuilt.
    pub const fn redraws(self) -> bool {
        matches!(
            self,
            Self::Inserted(_) | Self::Deleted(_) | Self::Moved(_) | Self::ModeChanged
        )
    }
}

/// Everything a rendering collaborator needs to draw the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Mode the polylines were built with.
    pub mode: CurveMode,
    /// Anchor positions in order.
    pub anchors: Vec<Point2>,
    /// Handle positions in flat index order.
    pub handles: Vec<Point2>,
    /// Guide lines from each anchor to each of its handles.
    pub guides: Vec<[Point2; 2]>,
    /// One sampled polyline per segment.
    pub polylines: Vec<Vec<Point2>>,
}

/// Receives frames after every geometry change.
pub trait Surface {
    /// Draw `frame`, replacing whatever was drawn before.
    fn present(&mut self, frame: &Frame);
}

/// Collects every presented frame.
impl Surface for Vec<Frame> {
    fn present(&mut self, frame: &Frame) {
        self.push(frame.clone());
    }
}

/// An editing session.
#[derive(Clone, Debug, Default)]
pub struct Editor {
    /// Anchors and handles.
    store: AnchorStore,
    /// Active composition mode.
    mode: CurveMode,
    /// Current selection.
    drag: DragState,
    /// Radii, offsets and sample count.
    config: EditorConfig,
}

impl Editor {
    /// A session with the default configuration and composite mode.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// A session with `config`.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            store: AnchorStore::with_handle_offset(config.handle_offset),
            mode: CurveMode::default(),
            drag: DragState::Idle,
            config,
        }
    }

    /// The session configuration.
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read access to the store.
    pub const fn store(&self) -> &AnchorStore {
        &self.store
    }

    /// The active mode.
    pub const fn mode(&self) -> CurveMode {
        self.mode
    }

    /// The current selection.
    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Apply one event.
    ///
    /// Errors only if the drag state refers to an entity the store no longer
    /// has, which the editor itself never allows to happen.
    pub fn apply(&mut self, event: Event) -> Result<Outcome> {
        let outcome = match event {
            Event::InteractionStart(at) => self.start(at),
            Event::InteractionMove(to) => self.drag_to(to)?,
            Event::InteractionEnd => {
                self.drag = DragState::Idle;
                Outcome::Released
            }
            Event::SecondaryAction(at) => self.delete_at(at)?,
            Event::CurveModeChanged(mode) => {
                debug!(from = %self.mode, to = %mode, "mode changed");
                self.mode = mode;
                Outcome::ModeChanged
            }
        };
        Ok(outcome)
    }

    /// Apply one event and present a fresh frame to `surface` if the geometry
    /// changed.
    pub fn dispatch<S>(&mut self, event: Event, surface: &mut S) -> Result<Outcome>
    where
        S: Surface + ?Sized,
    {
        let outcome = self.apply(event)?;
        if outcome.redraws() {
            surface.present(&self.frame());
        }
        Ok(outcome)
    }

    /// Segments for the current anchors and mode.
    pub fn segments(&self) -> Vec<Segment> {
        compose::compose(self.store.anchors(), self.mode)
    }

    /// Rebuild the full frame from the store.
    pub fn frame(&self) -> Frame {
        let samples = self.config.samples;
        Frame {
            mode: self.mode,
            anchors: self.store.anchor_positions().collect(),
            handles: self.store.handle_positions().collect(),
            guides: self.store.guides().collect(),
            polylines: self
                .segments()
                .iter()
                .map(|s| bezier::polyline(s, samples))
                .collect(),
        }
    }

    /// Interaction start: grab the entity under `at`, or add an anchor there.
    fn start(&mut self, at: Point2) -> Outcome {
        if !self.drag.is_idle() {
            debug!(state = ?self.drag, "interaction started while dragging; releasing");
            self.drag = DragState::Idle;
        }
        match select::pick(
            &self.store,
            at,
            self.config.anchor_radius,
            self.config.handle_radius,
        ) {
            Some(target) => {
                self.drag = DragState::grab(target);
                debug!(?target, "selected");
                Outcome::Selected(target)
            }
            None => Outcome::Inserted(self.store.insert_anchor(at)),
        }
    }

    /// Interaction move: drag the selected entity, if any.
    fn drag_to(&mut self, to: Point2) -> Result<Outcome> {
        let Some(target) = self.drag.target() else {
            return Ok(Outcome::Unchanged);
        };
        match target {
            Target::Anchor(i) => self.store.move_anchor(i, to)?,
            Target::Handle(i) => self.store.move_handle(i, to)?,
        }
        Ok(Outcome::Moved(target))
    }

    /// Secondary action: delete the anchor under `at`, if any.
    fn delete_at(&mut self, at: Point2) -> Result<Outcome> {
        let hit = select::hit_test(
            at,
            self.store.anchor_positions(),
            self.config.anchor_radius,
        );
        let Some(index) = hit else {
            return Ok(Outcome::Unchanged);
        };
        self.store.delete_anchor(index)?;
        // Indices held by the drag state may now be stale.
        self.drag = DragState::Idle;
        Ok(Outcome::Deleted(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn click(editor: &mut Editor, at: Point2) -> Result<Outcome> {
        let outcome = editor.apply(Event::InteractionStart(at))?;
        editor.apply(Event::InteractionEnd)?;
        Ok(outcome)
    }

    #[test]
    fn empty_space_inserts_and_stays_idle() -> Result<()> {
        let mut editor = Editor::new();
        assert_eq!(
            editor.apply(Event::InteractionStart(p(10.0, 10.0)))?,
            Outcome::Inserted(0)
        );
        assert_eq!(editor.drag_state(), DragState::Idle);
        // The new point is not draggable in the same gesture.
        assert_eq!(
            editor.apply(Event::InteractionMove(p(40.0, 40.0)))?,
            Outcome::Unchanged
        );
        assert_eq!(editor.store().anchor(0).map(|a| a.position), Some(p(10.0, 10.0)));
        Ok(())
    }

    #[test]
    fn drag_anchor_moves_handles() -> Result<()> {
        let mut editor = Editor::new();
        click(&mut editor, p(100.0, 100.0))?;
        assert_eq!(
            editor.apply(Event::InteractionStart(p(102.0, 101.0)))?,
            Outcome::Selected(Target::Anchor(0))
        );
        assert_eq!(
            editor.apply(Event::InteractionMove(p(150.0, 80.0)))?,
            Outcome::Moved(Target::Anchor(0))
        );
        assert_eq!(editor.apply(Event::InteractionEnd)?, Outcome::Released);
        assert!(editor.drag_state().is_idle());

        let a = editor.store().anchor(0).copied().expect("anchor");
        assert_eq!(a.position, p(150.0, 80.0));
        assert_eq!(a.prev, p(130.0, 80.0));
        assert_eq!(a.next, p(170.0, 80.0));
        Ok(())
    }

    #[test]
    fn drag_handle_only_moves_handle() -> Result<()> {
        let mut editor = Editor::new();
        click(&mut editor, p(100.0, 100.0))?;
        assert_eq!(
            editor.apply(Event::InteractionStart(p(121.0, 100.0)))?,
            Outcome::Selected(Target::Handle(1))
        );
        editor.apply(Event::InteractionMove(p(130.0, 60.0)))?;
        editor.apply(Event::InteractionEnd)?;

        let a = editor.store().anchor(0).copied().expect("anchor");
        assert_eq!(a.position, p(100.0, 100.0));
        assert_eq!(a.prev, p(80.0, 100.0));
        assert_eq!(a.next, p(130.0, 60.0));
        Ok(())
    }

    #[test]
    fn secondary_action_deletes_hit_anchor() -> Result<()> {
        let mut editor = Editor::new();
        click(&mut editor, p(0.0, 0.0))?;
        click(&mut editor, p(100.0, 0.0))?;
        assert_eq!(
            editor.apply(Event::SecondaryAction(p(50.0, 50.0)))?,
            Outcome::Unchanged
        );
        assert_eq!(
            editor.apply(Event::SecondaryAction(p(99.0, 0.0)))?,
            Outcome::Deleted(1)
        );
        assert_eq!(editor.store().len(), 1);
        assert_eq!(editor.store().handle_count(), 2);
        Ok(())
    }

    #[test]
    fn delete_while_dragging_releases() -> Result<()> {
        let mut editor = Editor::new();
        click(&mut editor, p(0.0, 0.0))?;
        click(&mut editor, p(100.0, 0.0))?;
        editor.apply(Event::InteractionStart(p(100.0, 0.0)))?;
        assert_eq!(editor.drag_state(), DragState::DraggingAnchor(1));
        editor.apply(Event::SecondaryAction(p(100.0, 0.0)))?;
        assert!(editor.drag_state().is_idle());
        assert_eq!(
            editor.apply(Event::InteractionMove(p(5.0, 5.0)))?,
            Outcome::Unchanged
        );
        Ok(())
    }

    #[test]
    fn dispatch_presents_on_geometry_changes_only() -> Result<()> {
        let mut editor = Editor::new();
        let mut frames: Vec<Frame> = Vec::new();
        editor.dispatch(Event::InteractionStart(p(0.0, 0.0)), &mut frames)?;
        editor.dispatch(Event::InteractionEnd, &mut frames)?;
        editor.dispatch(Event::InteractionStart(p(100.0, 0.0)), &mut frames)?;
        editor.dispatch(Event::InteractionEnd, &mut frames)?;
        assert_eq!(frames.len(), 2);
        assert!(frames[0].polylines.is_empty());
        assert_eq!(frames[1].polylines.len(), 1);
        assert_eq!(frames[1].polylines[0].len(), 100);

        editor.dispatch(Event::InteractionStart(p(0.0, 0.0)), &mut frames)?;
        assert_eq!(frames.len(), 2);
        editor.dispatch(Event::InteractionMove(p(0.0, 10.0)), &mut frames)?;
        editor.dispatch(Event::CurveModeChanged(CurveMode::Segmented), &mut frames)?;
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[3].mode, CurveMode::Segmented);
        Ok(())
    }

    #[test]
    fn frame_reflects_store() -> Result<()> {
        let mut editor = Editor::with_config(EditorConfig {
            samples: 5,
            ..EditorConfig::default()
        });
        editor.apply(Event::CurveModeChanged(CurveMode::Segmented))?;
        click(&mut editor, p(0.0, 0.0))?;
        click(&mut editor, p(100.0, 0.0))?;

        let frame = editor.frame();
        assert_eq!(frame.anchors, vec![p(0.0, 0.0), p(100.0, 0.0)]);
        assert_eq!(frame.handles.len(), 4);
        assert_eq!(frame.guides.len(), 4);
        assert_eq!(
            frame.polylines,
            vec![vec![
                p(0.0, 0.0),
                p(21.25, 0.0),
                p(50.0, 0.0),
                p(78.75, 0.0),
                p(100.0, 0.0)
            ]]
        );
        Ok(())
    }
}
