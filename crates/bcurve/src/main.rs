//! Command-line entry point for the `bcurve` tool.
//!
//! Replays recorded editing sessions into images, animations or text, and
//! renders Poisson-disk sample sets.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
    process,
};

use anyhow::Result;
use bezcurve::{
    CurveMode, EditorConfig,
    config::{ANCHOR_RADIUS, HANDLE_OFFSET, HANDLE_RADIUS, SAMPLES},
    poisson::{ATTEMPTS, PoissonConfig},
    registry,
};
use clap::{Args, Parser, Subcommand, builder::TypedValueParser};
use colornames::Color;
use image::Rgba;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI command implementations.
mod cmd;
/// Rendering helpers shared by the CLI.
mod raster;
/// Event script parsing.
mod script;

use crate::raster::{Palette, StrokeOptions};

/// Validate a mode name against the registry.
fn parse_mode(s: &str) -> Result<CurveMode, String> {
    registry::lookup(s).map_err(|_| {
        format!(
            "Invalid mode '{}'. Valid options: {}",
            s,
            registry::MODE_NAMES.join(", ")
        )
    })
}

/// Parse a hit radius: a finite, strictly positive number.
fn parse_radius(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid radius '{s}': expected a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("radius must be finite and positive, got {value}"))
    }
}

/// Parse a handle offset: any finite number.
fn parse_offset(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid offset '{s}': expected a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("offset must be finite, got {value}"))
    }
}

/// Parse a named or hex color into an `Rgba` value (alpha defaults to 0xff).
///
/// Supports CSS color names via `colornames`, short/long hex (RGB/RRGGBB),
/// and optional alpha (RGBA/RRGGBBAA) with or without a leading `#`.
fn parse_rgba_color(input: &str) -> Result<Rgba<u8>, String> {
    fn parse_hex_rgba(hex: &str) -> Option<Rgba<u8>> {
        let raw = hex.trim_start_matches('#');
        if !raw.is_ascii() || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&raw[i..=i], 16).ok().map(|v| v * 17);
        let pair = |i: usize| u8::from_str_radix(&raw[i..i + 2], 16).ok();

        let [r, g, b, a] = match raw.len() {
            3 => [nibble(0)?, nibble(1)?, nibble(2)?, 0xff],
            4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
            6 => [pair(0)?, pair(2)?, pair(4)?, 0xff],
            8 => [pair(0)?, pair(2)?, pair(4)?, pair(6)?],
            _ => return None,
        };
        Some(Rgba([r, g, b, a]))
    }

    let trimmed = input.trim();
    if let Some(rgba) = parse_hex_rgba(trimmed) {
        return Ok(rgba);
    }

    let color: Color = trimmed.try_into().map_err(|_| {
        format!(
            "invalid color '{input}': use a named color or hex (RGB/RRGGBB with optional alpha, leading '#' optional)"
        )
    })?;
    let (red, green, blue) = color.rgb();
    Ok(Rgba([red, green, blue, 0xff]))
}

#[derive(Parser)]
#[command(name = "bcurve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top-level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Stroke and color flags shared by the drawing commands.
#[derive(Args, Clone, Copy, Debug)]
struct StyleArgs {
    #[arg(
        short = 'w',
        long = "line-width",
        value_name = "PIXELS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=64),
        help = "Line width in pixels for the curve stroke"
    )]
    /// Stroke width.
    line_width: u32,
    #[arg(
        long = "fg",
        visible_alias = "foreground",
        value_parser = parse_rgba_color,
        default_value = "#1072b8",
        value_name = "HEX",
        help = "Foreground color (name or hex; RGB/RRGGBB with optional alpha, '#' optional)"
    )]
    /// Curve color.
    foreground: Rgba<u8>,
    #[arg(
        long = "bg",
        visible_alias = "background",
        value_parser = parse_rgba_color,
        default_value = "#ffffff",
        value_name = "HEX",
        help = "Background color (name or hex; RGB/RRGGBB with optional alpha, '#' optional)"
    )]
    /// Background color.
    background: Rgba<u8>,
}

impl StyleArgs {
    /// Stroke options with or without the handle overlay.
    const fn stroke(self, show_handles: bool) -> StrokeOptions {
        StrokeOptions {
            line_width: self.line_width,
            show_handles,
            palette: Palette::with_colors(self.foreground, self.background),
        }
    }
}

/// Flags for commands that replay an event script.
#[derive(Args, Clone, Debug)]
struct SessionArgs {
    #[arg(
        short = 'm',
        long = "mode",
        default_value = "composite",
        value_parser = parse_mode,
        help = &format!("Initial curve mode (options: {})", registry::MODE_NAMES.join(", "))
    )]
    /// Initial composition mode.
    mode: CurveMode,
    #[arg(
        short = 'n',
        long = "samples",
        default_value_t = SAMPLES,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize),
        help = "Samples per segment"
    )]
    /// Samples per segment.
    samples: usize,
    #[arg(
        long = "anchor-radius",
        default_value_t = ANCHOR_RADIUS,
        value_parser = parse_radius,
        help = "Anchor hit radius"
    )]
    /// Anchor hit radius.
    anchor_radius: f64,
    #[arg(
        long = "handle-radius",
        default_value_t = HANDLE_RADIUS,
        value_parser = parse_radius,
        help = "Handle hit radius"
    )]
    /// Handle hit radius.
    handle_radius: f64,
    #[arg(
        long = "handle-offset",
        default_value_t = HANDLE_OFFSET,
        value_parser = parse_offset,
        allow_negative_numbers = true,
        help = "Horizontal distance of new handles from their anchor"
    )]
    /// Initial handle offset.
    handle_offset: f64,
    #[arg(help = "Event script path")]
    /// Event script to replay.
    script: PathBuf,
}

impl SessionArgs {
    /// Editor configuration assembled from the flags.
    const fn config(&self) -> EditorConfig {
        EditorConfig {
            anchor_radius: self.anchor_radius,
            handle_radius: self.handle_radius,
            handle_offset: self.handle_offset,
            samples: self.samples,
        }
    }
}

#[derive(Subcommand)]
/// Subcommands supported by the `bcurve` tool.
enum Commands {
    #[command(about = "Replay an event script and save the final frame as PNG")]
    /// Render the final state of a session.
    Render {
        #[command(flatten)]
        /// Script and mode.
        session: SessionArgs,
        #[arg(
            short = 's',
            long = "size",
            default_value_t = 512,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Square image size in pixels"
        )]
        /// Image size in pixels (square output).
        size: u32,
        #[command(flatten)]
        /// Stroke and colors.
        style: StyleArgs,
        #[arg(long = "no-handles", help = "Draw only the curve, without anchors, handles or guides")]
        /// Hide the editing overlay.
        no_handles: bool,
        #[arg(help = "Output image path")]
        /// Output path.
        output: PathBuf,
    },
    #[command(about = "Replay an event script into an animated GIF")]
    /// Animate a session, one frame per redraw.
    Replay {
        #[command(flatten)]
        /// Script and mode.
        session: SessionArgs,
        #[arg(
            short = 's',
            long = "size",
            default_value_t = 256,
            value_parser = clap::value_parser!(u32).range(1..=65_535),
            help = "Square frame size in pixels"
        )]
        /// Frame size in pixels.
        size: u32,
        #[command(flatten)]
        /// Stroke and colors.
        style: StyleArgs,
        #[arg(long = "no-handles", help = "Draw only the curve, without anchors, handles or guides")]
        /// Hide the editing overlay.
        no_handles: bool,
        #[arg(
            long = "fps",
            default_value_t = 10,
            value_parser = clap::value_parser!(u16).range(1..=120),
            help = "Frames per second for the animated GIF"
        )]
        /// Frames per second (1-120).
        fps: u16,
        #[arg(help = "Output GIF file path")]
        /// Output GIF path.
        output: PathBuf,
    },
    #[command(about = "Replay an event script and print the sampled polylines")]
    /// Print the final polylines as text.
    Eval {
        #[command(flatten)]
        /// Script and mode.
        session: SessionArgs,
    },
    #[command(about = "Render a Poisson-disk sample set")]
    /// Generate and draw blue-noise samples.
    Poisson {
        #[arg(long = "width", default_value_t = 10.0, help = "Region width")]
        /// Region width in world units.
        width: f64,
        #[arg(long = "height", default_value_t = 10.0, help = "Region height")]
        /// Region height in world units.
        height: f64,
        #[arg(short = 'r', long = "radius", default_value_t = 1.0, help = "Minimum distance between samples")]
        /// Minimum sample distance.
        radius: f64,
        #[arg(
            short = 'k',
            long = "attempts",
            default_value_t = ATTEMPTS,
            value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize),
            help = "Candidates tried around each active point"
        )]
        /// Candidates per active point.
        attempts: usize,
        #[arg(long = "max-iterations", help = "Stop after this many iterations")]
        /// Optional iteration cap.
        max_iterations: Option<usize>,
        #[arg(long = "seed", help = "RNG seed for reproducible output")]
        /// Optional RNG seed.
        seed: Option<u64>,
        #[arg(
            short = 's',
            long = "size",
            default_value_t = 512,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Image size in pixels along the longer side"
        )]
        /// Image size along the longer side.
        size: u32,
        #[arg(long = "edges", help = "Draw a line from each sample to the one that spawned it")]
        /// Draw parent to child edges.
        edges: bool,
        #[arg(long = "circles", help = "Draw a circle of half the minimum distance around each sample")]
        /// Draw spacing circles.
        circles: bool,
        #[command(flatten)]
        /// Stroke and colors.
        style: StyleArgs,
        #[arg(help = "Output image path")]
        /// Output path.
        output: PathBuf,
    },
    /// List supported curve modes.
    ListModes,
}

/// Install a stderr subscriber; `RUST_LOG` overrides the `-v` level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Print a success message or exit with an error.
fn report_ok<E: Display>(result: Result<(), E>, ok_msg: &str) {
    match result {
        Ok(()) => println!("{ok_msg}"),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// Handle the `render` subcommand.
fn handle_render(
    session: &SessionArgs,
    size: u32,
    stroke: StrokeOptions,
    output: &Path,
) -> Result<()> {
    let events = script::load(&session.script)?;
    let image = cmd::render(
        &events,
        cmd::RenderOptions {
            size,
            mode: session.mode,
            config: session.config(),
            stroke,
        },
    )?;
    image.save(output)?;
    Ok(())
}

/// Handle the `replay` subcommand.
fn handle_replay(
    session: &SessionArgs,
    size: u32,
    stroke: StrokeOptions,
    fps: u16,
    output: &Path,
) -> Result<()> {
    let events = script::load(&session.script)?;
    let frames = cmd::replay_gif(
        &events,
        cmd::RenderOptions {
            size,
            mode: session.mode,
            config: session.config(),
            stroke,
        },
        fps,
        output,
    )?;
    debug!(frames, path = %output.display(), "wrote animation");
    Ok(())
}

/// Handle the `eval` subcommand.
fn handle_eval(session: &SessionArgs) -> Result<()> {
    let events = script::load(&session.script)?;
    print!("{}", cmd::eval(&events, session.mode, session.config())?);
    Ok(())
}

/// Handle the `poisson` subcommand, returning the sample count.
fn handle_poisson(opts: cmd::PoissonOptions, output: &Path) -> Result<usize> {
    let (image, sampling) = cmd::poisson(opts)?;
    image.save(output)?;
    Ok(sampling.points.len())
}

/// Handle the `list-modes` subcommand.
fn handle_list_modes() {
    println!("Supported modes (key - display - description):");
    for entry in registry::REGISTRY {
        println!(
            "- {} - {} - {}",
            entry.key, entry.display, entry.description
        );
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.v);

    match cli.command {
        Commands::Render {
            session,
            size,
            style,
            no_handles,
            output,
        } => report_ok(
            handle_render(&session, size, style.stroke(!no_handles), &output),
            "OK!",
        ),
        Commands::Replay {
            session,
            size,
            style,
            no_handles,
            fps,
            output,
        } => report_ok(
            handle_replay(&session, size, style.stroke(!no_handles), fps, &output),
            "Saved replay GIF!",
        ),
        Commands::Eval { session } => {
            if let Err(e) = handle_eval(&session) {
                eprintln!("{e:#}");
                process::exit(1);
            }
        }
        Commands::Poisson {
            width,
            height,
            radius,
            attempts,
            max_iterations,
            seed,
            size,
            edges,
            circles,
            style,
            output,
        } => {
            let opts = cmd::PoissonOptions {
                config: PoissonConfig {
                    width,
                    height,
                    radius,
                    attempts,
                    max_iterations,
                },
                seed,
                size,
                edges,
                circles,
                stroke: style.stroke(false),
            };
            match handle_poisson(opts, &output) {
                Ok(count) => println!("Saved {count} samples"),
                Err(e) => {
                    eprintln!("{e:#}");
                    process::exit(1);
                }
            }
        }
        Commands::ListModes => handle_list_modes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colors() {
        assert_eq!(parse_rgba_color("#fff"), Ok(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_rgba_color("10203040"), Ok(Rgba([0x10, 0x20, 0x30, 0x40])));
        assert_eq!(parse_rgba_color("red"), Ok(Rgba([255, 0, 0, 255])));
        assert!(parse_rgba_color("#12345").is_err());
        assert!(parse_rgba_color("not-a-color").is_err());
    }

    #[test]
    fn parses_modes() {
        assert_eq!(parse_mode("Segmented"), Ok(CurveMode::Segmented));
        assert_eq!(parse_mode("N-Bezier"), Ok(CurveMode::Composite));
        let err = parse_mode("spiral").unwrap_err();
        assert!(err.contains("composite, segmented, single"));
    }

    #[test]
    fn parses_editor_geometry_flags() {
        assert_eq!(parse_radius("8"), Ok(8.0));
        assert_eq!(parse_offset("-12.5"), Ok(-12.5));
        for bad in ["0", "-1", "nan", "inf", "x"] {
            assert!(parse_radius(bad).is_err(), "{bad}");
        }
        for bad in ["inf", "-inf", "NaN", ""] {
            assert!(parse_offset(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
