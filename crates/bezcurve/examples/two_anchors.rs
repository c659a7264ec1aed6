//! Minimal editing session: place two anchors, bend a handle, sample the curve.

use std::error::Error;

use bezcurve::{CurveMode, Editor, Event, Point2};

fn main() -> Result<(), Box<dyn Error>> {
    // snips-start: example
    let mut editor = Editor::new();
    editor.apply(Event::CurveModeChanged(CurveMode::Segmented))?;

    for at in [Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)] {
        editor.apply(Event::InteractionStart(at))?;
        editor.apply(Event::InteractionEnd)?;
    }

    // Drag the first anchor's next-side handle upward.
    editor.apply(Event::InteractionStart(Point2::new(20.0, 0.0)))?;
    editor.apply(Event::InteractionMove(Point2::new(20.0, 60.0)))?;
    editor.apply(Event::InteractionEnd)?;

    let frame = editor.frame();
    println!("{} anchors, {} handles", frame.anchors.len(), frame.handles.len());
    for (i, line) in frame.polylines.iter().enumerate() {
        let mid = line[line.len() / 2];
        println!("segment {i}: {} samples, midpoint near {mid}", line.len());
    }
    // snips-end: example

    Ok(())
}
