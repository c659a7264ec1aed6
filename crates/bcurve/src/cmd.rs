//! Command handlers for the `bcurve` CLI.
//!
//! Each handler replays a parsed event script through an [`Editor`] and turns
//! the resulting frames into an image, an animation or text.

use std::{fmt::Write as _, fs::File, path::Path};

use anyhow::{Result, bail};
use bezcurve::{
    CurveMode, Editor, EditorConfig, Event, Frame, Point2, Surface,
    poisson::{PoissonConfig, PoissonSampler, Sampling},
    registry,
};
use gif::{Encoder, Repeat};
use image::RgbaImage;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::raster::{
    StrokeOptions, Viewport, draw_circle, draw_disc, draw_line, frame_points, render_frame,
};

/// Pixel margin kept around fitted content.
const MARGIN: u32 = 16;
/// Pixel radius of a Poisson sample marker.
const SAMPLE_MARKER: i64 = 2;

/// Options shared by the rendering commands.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Square output size in pixels.
    pub size: u32,
    /// Initial composition mode; scripts may switch it.
    pub mode: CurveMode,
    /// Hit radii, handle offset and samples per segment.
    pub config: EditorConfig,
    /// Stroke styling.
    pub stroke: StrokeOptions,
}

/// Build an editor for `mode` and `config`.
fn editor(mode: CurveMode, config: EditorConfig) -> Result<Editor> {
    let mut editor = Editor::with_config(config);
    editor.apply(Event::CurveModeChanged(mode))?;
    Ok(editor)
}

/// Replay `events`, presenting every redraw to `surface`.
fn replay<S: Surface>(
    events: &[Event],
    mode: CurveMode,
    config: EditorConfig,
    surface: &mut S,
) -> Result<Editor> {
    let mut editor = editor(mode, config)?;
    for (i, event) in events.iter().enumerate() {
        let outcome = editor.dispatch(*event, surface)?;
        debug!(step = i, ?event, ?outcome, "replayed");
    }
    info!(
        events = events.len(),
        anchors = editor.store().len(),
        mode = %editor.mode(),
        "script replayed"
    );
    Ok(editor)
}

/// Keeps only the most recently presented frame.
#[derive(Debug, Default)]
struct LastFrame(Option<Frame>);

impl Surface for LastFrame {
    fn present(&mut self, frame: &Frame) {
        self.0 = Some(frame.clone());
    }
}

/// Replay a script and render its final state.
pub fn render(events: &[Event], opts: RenderOptions) -> Result<RgbaImage> {
    let mut last = LastFrame::default();
    let editor = replay(events, opts.mode, opts.config, &mut last)?;
    // A script with no geometry changes never presents; draw the idle state.
    let frame = last.0.unwrap_or_else(|| editor.frame());
    let view = Viewport::fit(frame_points(&frame), opts.size, opts.size, MARGIN);
    Ok(render_frame(&frame, &view, opts.size, opts.size, opts.stroke))
}

/// Convert frames per second to a GIF frame delay in centiseconds.
fn frame_delay_from_fps(fps: u16) -> u16 {
    // GIF delays are centiseconds; clamp to at least 1cs to avoid zero-delay frames.
    let fps = fps.max(1);
    ((100 + (fps / 2)) / fps).max(1)
}

/// Replay a script into an animated GIF with one frame per redraw.
///
/// Every frame shares one viewport fitted to the whole session so the
/// animation does not jump. Returns the number of frames written.
pub fn replay_gif(events: &[Event], opts: RenderOptions, fps: u16, output: &Path) -> Result<usize> {
    let Ok(side) = u16::try_from(opts.size) else {
        bail!("GIF size must be at most {} pixels", u16::MAX);
    };

    let mut frames: Vec<Frame> = Vec::new();
    let editor = replay(events, opts.mode, opts.config, &mut frames)?;
    if frames.is_empty() {
        frames.push(editor.frame());
    }

    let view = Viewport::fit(
        frames.iter().flat_map(frame_points),
        opts.size,
        opts.size,
        MARGIN,
    );

    let mut file = File::create(output)?;
    let mut encoder = Encoder::new(&mut file, side, side, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;
    let frame_delay = frame_delay_from_fps(fps);

    for frame in &frames {
        let img = render_frame(frame, &view, opts.size, opts.size, opts.stroke);
        let mut raw = img.into_raw();
        let mut gif_frame = gif::Frame::from_rgba_speed(side, side, &mut raw, 10);
        gif_frame.delay = frame_delay;
        encoder.write_frame(&gif_frame)?;
    }

    Ok(frames.len())
}

/// Replay a script and describe the final polylines as text.
///
/// The first line summarises the session; each segment follows as a
/// `segment I degree D` header and one `x y` line per sample.
pub fn eval(events: &[Event], mode: CurveMode, config: EditorConfig) -> Result<String> {
    let mut last = LastFrame::default();
    let editor = replay(events, mode, config, &mut last)?;
    let segments = editor.segments();
    let frame = last.0.unwrap_or_else(|| editor.frame());

    let mut out = String::new();
    writeln!(
        out,
        "# mode={} anchors={} segments={}",
        registry::entry(frame.mode).key,
        frame.anchors.len(),
        segments.len()
    )?;
    for (i, (segment, line)) in segments.iter().zip(&frame.polylines).enumerate() {
        writeln!(out, "segment {i} degree {}", segment.len().saturating_sub(1))?;
        for Point2 { x, y } in line {
            writeln!(out, "{x:.3} {y:.3}")?;
        }
    }
    Ok(out)
}

/// Options for the `poisson` command.
#[derive(Clone, Copy, Debug)]
pub struct PoissonOptions {
    /// Sampler parameters.
    pub config: PoissonConfig,
    /// RNG seed; a fresh random seed when absent.
    pub seed: Option<u64>,
    /// Output size in pixels along the longer side of the region.
    pub size: u32,
    /// Draw a line from each point to the point that spawned it.
    pub edges: bool,
    /// Draw a circle of half the minimum distance around each point.
    pub circles: bool,
    /// Stroke styling.
    pub stroke: StrokeOptions,
}

/// Run the Poisson-disk sampler and render the result.
pub fn poisson(opts: PoissonOptions) -> Result<(RgbaImage, Sampling)> {
    let sampler = PoissonSampler::new(opts.config)?;
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampling = sampler.sample(&mut rng);
    info!(
        points = sampling.points.len(),
        iterations = sampling.iterations,
        "sampled"
    );

    let PoissonConfig {
        width,
        height,
        radius,
        ..
    } = *sampler.config();
    let view = Viewport::region(width.max(height), opts.size);
    let px = |extent: f64| ((extent * view.scale()).ceil() as u32).max(1);
    let palette = opts.stroke.palette;
    let mut img = RgbaImage::from_pixel(px(width), px(height), palette.background);

    if opts.edges {
        for &(parent, child) in &sampling.edges {
            let from = view.to_pixel(sampling.points[parent]);
            let to = view.to_pixel(sampling.points[child]);
            if let (Some(from), Some(to)) = (from, to) {
                draw_line(&mut img, from, to, palette.guide, 1);
            }
        }
    }
    if opts.circles {
        // A circle wider than twice the image never touches it.
        let r = (radius / 2.0 * view.scale())
            .round()
            .min(f64::from(opts.size) * 2.0) as i64;
        for p in sampling.points.iter().filter_map(|p| view.to_pixel(*p)) {
            draw_circle(&mut img, p, r, palette.handle);
        }
    }
    let marker = SAMPLE_MARKER.max(i64::from(opts.stroke.line_width) / 2);
    for p in sampling.points.iter().filter_map(|p| view.to_pixel(*p)) {
        draw_disc(&mut img, p, marker, palette.foreground);
    }

    Ok((img, sampling))
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::{raster::Palette, script};

    fn stroke() -> StrokeOptions {
        StrokeOptions {
            line_width: 1,
            show_handles: true,
            palette: Palette::with_colors(Rgba([0, 0, 255, 255]), Rgba([255, 255, 255, 255])),
        }
    }

    fn samples(samples: usize) -> EditorConfig {
        EditorConfig {
            samples,
            ..EditorConfig::default()
        }
    }

    fn opts(size: u32) -> RenderOptions {
        RenderOptions {
            size,
            mode: CurveMode::Composite,
            config: samples(50),
            stroke: stroke(),
        }
    }

    #[test]
    fn fps_to_delay() {
        assert_eq!(frame_delay_from_fps(1), 100);
        assert_eq!(frame_delay_from_fps(20), 5);
        assert_eq!(frame_delay_from_fps(120), 1);
        assert_eq!(frame_delay_from_fps(0), 100);
    }

    #[test]
    fn render_size_matches_request() -> Result<()> {
        let events = script::parse("add 0 0\nadd 100 50\nadd 200 0\n")?;
        let img = render(&events, opts(96))?;
        assert_eq!(img.dimensions(), (96, 96));
        Ok(())
    }

    #[test]
    fn empty_script_renders_background() -> Result<()> {
        let img = render(&[], opts(32))?;
        assert!(img.pixels().all(|p| *p == stroke().palette.background));
        Ok(())
    }

    #[test]
    fn eval_lists_segments() -> Result<()> {
        let events = script::parse("add 0 0\nadd 100 0\nadd 200 0\n")?;
        let text = eval(&events, CurveMode::Composite, samples(5))?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# mode=composite anchors=3 segments=2");
        assert_eq!(lines[1], "segment 0 degree 2");
        assert_eq!(lines[2], "0.000 0.000");
        assert_eq!(lines[7], "segment 1 degree 2");
        assert_eq!(lines.len(), 1 + 2 * 6);
        Ok(())
    }

    #[test]
    fn eval_honours_mode_events() -> Result<()> {
        let events = script::parse("add 0 0\nadd 100 0\nmode single\n")?;
        let text = eval(&events, CurveMode::Segmented, samples(3))?;
        assert!(text.starts_with("# mode=single anchors=2 segments=1"));
        assert!(text.contains("segment 0 degree 3"));
        Ok(())
    }

    #[test]
    fn render_survives_extreme_coordinates() -> Result<()> {
        let events = script::parse("add -1e308 0\ndown -1e308 0\ndrag 1e308 0\nup\n")?;
        let opts = RenderOptions {
            config: EditorConfig {
                handle_offset: 1e307,
                ..EditorConfig::default()
            },
            ..opts(48)
        };
        let img = render(&events, opts)?;
        assert_eq!(img.dimensions(), (48, 48));
        assert!(img.pixels().any(|p| *p == stroke().palette.anchor));
        Ok(())
    }

    #[test]
    fn gif_has_one_frame_per_redraw() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("session.gif");
        // Two inserts, one grab (no redraw), two moves, release (no redraw).
        let events = script::parse("add 0 0\nadd 100 0\ndown 0 0\ndrag 0 10\ndrag 0 20\nup\n")?;
        let frames = replay_gif(&events, opts(64), 10, &out)?;
        assert_eq!(frames, 4);
        assert!(std::fs::metadata(&out)?.len() > 0);
        Ok(())
    }

    #[test]
    fn poisson_is_reproducible() -> Result<()> {
        let opts = PoissonOptions {
            config: PoissonConfig {
                width: 20.0,
                height: 10.0,
                radius: 1.0,
                ..PoissonConfig::default()
            },
            seed: Some(7),
            size: 200,
            edges: true,
            circles: true,
            stroke: stroke(),
        };
        let (img, first) = poisson(opts)?;
        let (_, second) = poisson(opts)?;
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(first.points, second.points);
        assert_eq!(first.edges.len() + 1, first.points.len());
        Ok(())
    }

    #[test]
    fn poisson_rejects_bad_radius() {
        let opts = PoissonOptions {
            config: PoissonConfig {
                radius: 0.0,
                ..PoissonConfig::default()
            },
            seed: Some(1),
            size: 64,
            edges: false,
            circles: false,
            stroke: stroke(),
        };
        assert!(poisson(opts).is_err());
    }
}
