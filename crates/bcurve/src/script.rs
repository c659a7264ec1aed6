//! Parser for recorded interaction scripts.
//!
//! A script holds one event per line:
//!
//! ```text
//! # comment
//! add 0 0          # shorthand for `down 0 0` then `up`
//! down 20 0
//! drag 20 60
//! up
//! delete 0 0
//! mode segmented
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use bezcurve::{Event, Point2, mode_from_name};

/// Parse a coordinate pair from the remaining words of a line.
fn parse_point<'a, I>(mut words: I) -> Result<Point2>
where
    I: Iterator<Item = &'a str>,
{
    let mut coord = |axis: &str| -> Result<f64> {
        let word = words
            .next()
            .ok_or_else(|| anyhow!("missing {axis} coordinate"))?;
        let value: f64 = word
            .parse()
            .map_err(|_| anyhow!("invalid {axis} coordinate '{word}'"))?;
        if !value.is_finite() {
            bail!("{axis} coordinate must be finite");
        }
        Ok(value)
    };
    let x = coord("x")?;
    let y = coord("y")?;
    Ok(Point2::new(x, y))
}

/// Parse one non-empty, comment-stripped line into events.
fn parse_line(line: &str, out: &mut Vec<Event>) -> Result<()> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(());
    };
    let before = out.len();
    match verb.to_ascii_lowercase().as_str() {
        "down" => out.push(Event::InteractionStart(parse_point(&mut words)?)),
        "drag" => out.push(Event::InteractionMove(parse_point(&mut words)?)),
        "up" => out.push(Event::InteractionEnd),
        "delete" => out.push(Event::SecondaryAction(parse_point(&mut words)?)),
        "add" => {
            out.push(Event::InteractionStart(parse_point(&mut words)?));
            out.push(Event::InteractionEnd);
        }
        "mode" => {
            let name = words.next().ok_or_else(|| anyhow!("missing mode name"))?;
            out.push(Event::CurveModeChanged(mode_from_name(name)?));
        }
        other => bail!("unknown event '{other}'"),
    }
    if let Some(extra) = words.next() {
        out.truncate(before);
        bail!("unexpected trailing input '{extra}'");
    }
    Ok(())
}

/// Parse script text into the sequence of events it records.
pub fn parse(source: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (number, raw) in source.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        parse_line(line, &mut events).with_context(|| format!("line {}: '{}'", number + 1, raw.trim()))?;
    }
    Ok(events)
}

/// Read and parse a script file.
pub fn load(path: &Path) -> Result<Vec<Event>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&source)
}

#[cfg(test)]
mod tests {
    use bezcurve::CurveMode;

    use super::*;

    #[test]
    fn parses_every_verb() -> Result<()> {
        let events = parse(
            "# header\n\
             add 0 0\n\
             \n\
             down 20 0  # grab handle\n\
             drag 20.5 -60\n\
             up\n\
             delete 0 0\n\
             MODE N-Bezier\n",
        )?;
        assert_eq!(
            events,
            vec![
                Event::InteractionStart(Point2::new(0.0, 0.0)),
                Event::InteractionEnd,
                Event::InteractionStart(Point2::new(20.0, 0.0)),
                Event::InteractionMove(Point2::new(20.5, -60.0)),
                Event::InteractionEnd,
                Event::SecondaryAction(Point2::new(0.0, 0.0)),
                Event::CurveModeChanged(CurveMode::Composite),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_script_has_no_events() -> Result<()> {
        assert!(parse("\n   \n# nothing\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse("add 0 0\ndrag 1\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("missing y coordinate"), "{msg}");
    }

    #[test]
    fn rejects_bad_input() {
        for bad in [
            "jump 1 2",
            "down x 2",
            "down 1 inf",
            "up now",
            "add 1 2 3",
            "mode spiral",
            "mode",
        ] {
            assert!(parse(bad).is_err(), "{bad} should fail");
        }
    }
}
