//! End-to-end editing scenarios driven through the event interface.
#[cfg(test)]
mod tests {
    use bezcurve::{
        CurveMode, Editor, Event, Frame, Point2, compose, error, evaluate,
        select::{DragState, Target},
    };

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn add(editor: &mut Editor, at: Point2) -> error::Result<()> {
        editor.apply(Event::InteractionStart(at))?;
        editor.apply(Event::InteractionEnd)?;
        Ok(())
    }

    #[test]
    fn straight_segment_midpoint() -> error::Result<()> {
        let mut editor = Editor::new();
        editor.apply(Event::CurveModeChanged(CurveMode::Segmented))?;
        add(&mut editor, p(0.0, 0.0))?;
        add(&mut editor, p(100.0, 0.0))?;

        let segments = editor.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].as_slice(),
            &[p(0.0, 0.0), p(20.0, 0.0), p(80.0, 0.0), p(100.0, 0.0)]
        );
        assert_eq!(evaluate(&segments[0], 0.5), p(50.0, 0.0));
        Ok(())
    }

    #[test]
    fn deleting_everything_leaves_nothing() -> error::Result<()> {
        let mut editor = Editor::new();
        add(&mut editor, p(0.0, 0.0))?;
        add(&mut editor, p(100.0, 0.0))?;
        editor.apply(Event::SecondaryAction(p(0.0, 0.0)))?;
        // The second anchor is now anchor 0.
        editor.apply(Event::SecondaryAction(p(100.0, 0.0)))?;

        assert_eq!(editor.store().len(), 0);
        assert_eq!(editor.store().handle_count(), 0);
        assert!(editor.segments().is_empty());
        assert_eq!(editor.frame(), Frame::default());
        Ok(())
    }

    #[test]
    fn delete_then_reinsert_restores_counts() -> error::Result<()> {
        let mut editor = Editor::new();
        for x in [0.0, 100.0, 200.0] {
            add(&mut editor, p(x, 0.0))?;
        }
        // Reshape a handle so the re-inserted anchor visibly gets defaults.
        editor.apply(Event::InteractionStart(p(220.0, 0.0)))?;
        editor.apply(Event::InteractionMove(p(230.0, 50.0)))?;
        editor.apply(Event::InteractionEnd)?;

        editor.apply(Event::SecondaryAction(p(200.0, 0.0)))?;
        assert_eq!(editor.store().len(), 2);
        add(&mut editor, p(200.0, 0.0))?;

        assert_eq!(editor.store().len(), 3);
        assert_eq!(editor.store().handle_count(), 6);
        assert_eq!(editor.store().handle(5), Some(p(220.0, 0.0)));
        Ok(())
    }

    #[test]
    fn handle_beats_overlapping_anchor() -> error::Result<()> {
        let mut editor = Editor::new();
        add(&mut editor, p(0.0, 0.0))?;
        add(&mut editor, p(100.0, 0.0))?;
        // Pull anchor 1's previous handle next to anchor 0.
        editor.apply(Event::InteractionStart(p(80.0, 0.0)))?;
        editor.apply(Event::InteractionMove(p(4.0, 0.0)))?;
        editor.apply(Event::InteractionEnd)?;

        // (2, 0) is within 8 of anchor 0 and within 6 of handle 2.
        let outcome = editor.apply(Event::InteractionStart(p(2.0, 0.0)))?;
        assert_eq!(
            outcome,
            bezcurve::editor::Outcome::Selected(Target::Handle(2))
        );
        assert_eq!(editor.drag_state(), DragState::DraggingHandle(2));
        Ok(())
    }

    #[test]
    fn mode_switch_recomposes() -> error::Result<()> {
        let mut editor = Editor::new();
        for x in [0.0, 100.0, 200.0, 300.0, 400.0] {
            add(&mut editor, p(x, 0.0))?;
        }
        let lengths = |segs: Vec<bezcurve::Segment>| segs.iter().map(|s| s.len()).collect::<Vec<_>>();
        assert_eq!(lengths(editor.segments()), vec![3, 4, 4, 3]);
        editor.apply(Event::CurveModeChanged(CurveMode::Segmented))?;
        assert_eq!(lengths(editor.segments()), vec![4, 4, 4, 4]);
        assert_eq!(
            editor.segments(),
            compose(editor.store().anchors(), CurveMode::Segmented)
        );
        Ok(())
    }
}
