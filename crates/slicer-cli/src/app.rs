//! Command line parsing and subcommand dispatch.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::RgbImage;
use slicer_core::{ExportOrder, PreviewClock, SessionState, SlicerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Slice sprite sheets into animation frames.
#[derive(Parser, Debug)]
#[command(name = "sprite-slicer", version, about = "Slice sprite sheets into animation frames")]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Sheet to open and optional frame size overrides.
#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Sprite sheet image
    pub sheet: PathBuf,

    /// Frame width in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub frame_width: Option<i64>,

    /// Frame height in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub frame_height: Option<i64>,
}

/// Requested animation range; clamped to the sheet's frames.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First frame index
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub start: i64,

    /// Last frame index (inclusive)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub end: i64,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the grid a sheet slices into
    Inspect {
        #[command(flatten)]
        sheet: SheetArgs,
    },
    /// Write the packed canvas with the range outlined
    Pack {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Output PNG
        #[arg(long)]
        out: PathBuf,
        /// Scale to the configured display size
        #[arg(long)]
        display: bool,
    },
    /// Pick a range with display-space clicks
    Select {
        #[command(flatten)]
        sheet: SheetArgs,
        /// Click position as X,Y (repeatable)
        #[arg(long = "click", required = true)]
        clicks: Vec<Point>,
    },
    /// Export a range as individual PNG frames
    Export {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Root directory; must already exist
        #[arg(long)]
        output_dir: PathBuf,
        /// Sprite name (first directory level)
        #[arg(long, default_value = "")]
        sprite: String,
        /// Animation name (second directory level and file prefix)
        #[arg(long, default_value = "")]
        animation: String,
        /// Frame numbering order
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },
    /// Play a range for a number of ticks
    Preview {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Frames per second
        #[arg(long, allow_negative_numbers = true)]
        fps: Option<i64>,
        /// Number of frames to show
        #[arg(long, default_value_t = 8)]
        ticks: u32,
        /// Write each rendered frame here
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Frame numbering order on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// First frame gets the highest number, the rest count up from 0
    Cyclic,
    /// Frames are numbered 0.. in sheet order
    Sequential,
}

impl From<OrderArg> for ExportOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Cyclic => Self::Cyclic,
            OrderArg::Sequential => Self::Sequential,
        }
    }
}

/// A click position on the display canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Pixels from the left edge
    pub x: u32,
    /// Pixels from the top edge
    pub y: u32,
}

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
        let coord = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid coordinate '{v}': {e}"))
        };
        Ok(Self {
            x: coord(x)?,
            y: coord(y)?,
        })
    }
}

/// Runs the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SlicerConfig::load_from(path),
        None => SlicerConfig::load(),
    };
    debug!("Configuration: {config:?}");

    match cli.command {
        Command::Inspect { sheet } => inspect(config, &sheet),
        Command::Pack {
            sheet,
            range,
            out,
            display,
        } => pack(config, &sheet, &range, &out, display),
        Command::Select { sheet, clicks } => select(config, &sheet, &clicks),
        Command::Export {
            sheet,
            range,
            output_dir,
            sprite,
            animation,
            order,
        } => {
            let mut config = config;
            if let Some(order) = order {
                config.export_order = order.into();
            }
            export(config, &sheet, &range, output_dir, sprite, animation)
        },
        Command::Preview {
            sheet,
            range,
            fps,
            ticks,
            out_dir,
        } => preview(config, &sheet, &range, fps, ticks, out_dir),
    }
}

/// Builds a session with the overrides applied and the sheet loaded.
fn open_session(
    config: SlicerConfig,
    sheet: &SheetArgs,
    range: Option<&RangeArgs>,
) -> Result<SessionState> {
    let mut session = SessionState::new(config);
    {
        let fields = session.fields_mut();
        if let Some(width) = sheet.frame_width {
            fields.frame_width = width;
        }
        if let Some(height) = sheet.frame_height {
            fields.frame_height = height;
        }
        if let Some(range) = range {
            fields.start = range.start;
            fields.end = range.end;
        }
    }

    session.load_sheet(&sheet.sheet)?;
    Ok(session)
}

fn inspect(config: SlicerConfig, args: &SheetArgs) -> Result<()> {
    let session = open_session(config, args, None)?;
    let grid = session.grid().context("sheet produced no grid")?;
    let (canvas_w, canvas_h) = grid.canvas_pixel_dimensions();

    println!(
        "Sheet: {} ({}x{})",
        args.sheet.display(),
        grid.sheet_width(),
        grid.sheet_height()
    );
    println!("  frame size: {}", grid.frame());
    println!(
        "  grid: {} rows x {} cols, {} frames",
        grid.n_rows(),
        grid.n_cols(),
        grid.frame_count()
    );
    println!(
        "  canvas: {} cells per side ({canvas_w}x{canvas_h} px)",
        grid.canvas_size()
    );
    Ok(())
}

fn pack(
    config: SlicerConfig,
    args: &SheetArgs,
    range: &RangeArgs,
    out: &Path,
    display: bool,
) -> Result<()> {
    let session = open_session(config, args, Some(range))?;
    let canvas: RgbImage = if display {
        session.display_canvas()
    } else {
        session.canvas().cloned()
    }
    .context("sheet produced no canvas")?;

    canvas
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "Wrote {}x{} canvas to {} (range {})",
        canvas.width(),
        canvas.height(),
        out.display(),
        session.range()
    );
    Ok(())
}

fn select(config: SlicerConfig, args: &SheetArgs, clicks: &[Point]) -> Result<()> {
    let mut session = open_session(config, args, None)?;

    for point in clicks {
        match session.click(point.x, point.y)? {
            Some(range) => println!("Selected frames {range}"),
            None => println!("{}", session.status()),
        }
    }
    Ok(())
}

fn export(
    config: SlicerConfig,
    args: &SheetArgs,
    range: &RangeArgs,
    output_dir: PathBuf,
    sprite: String,
    animation: String,
) -> Result<()> {
    let mut session = open_session(config, args, Some(range))?;
    session.set_output_dir(output_dir)?;
    {
        let fields = session.fields_mut();
        fields.sprite_name = sprite;
        fields.animation_name = animation;
    }

    let report = session.export()?;
    println!("{}", session.status());
    for file in &report.files {
        println!("  {}", file.display());
    }
    Ok(())
}

fn preview(
    config: SlicerConfig,
    args: &SheetArgs,
    range: &RangeArgs,
    fps: Option<i64>,
    ticks: u32,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let mut session = open_session(config, args, Some(range))?;
    if let Some(fps) = fps {
        session.fields_mut().fps = fps;
        session.update()?;
    }

    let snapshot = session
        .preview_snapshot()
        .context("sheet produced no preview")?;
    if let Some(dir) = &out_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let box_size = session.config().preview_size;
    let mut player = session.preview().clone();
    let mut clock = PreviewClock::new(player.period());
    info!(
        "Previewing frames {} at {} fps ({} ms per frame)",
        snapshot.range(),
        player.fps(),
        clock.period().as_millis()
    );

    for tick in 0..ticks {
        let cursor = player.advance(snapshot.range());
        let idx = snapshot.frame_index(cursor);
        println!("tick {tick}: frame {idx}");

        if let Some(dir) = &out_dir {
            let path = dir.join(format!("preview_{tick:04}.png"));
            snapshot
                .render(cursor, box_size)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }

        clock.sleep_remainder();
        clock.mark();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{Rgba, RgbaImage};
    use slicer_common::SlicerError;
    use tempfile::TempDir;

    fn write_sheet(dir: &Path) -> PathBuf {
        let path = dir.join("sheet.png");
        RgbaImage::from_pixel(128, 64, Rgba([40, 80, 120, 255]))
            .save(&path)
            .expect("save sheet");
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parse command line")
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_point_parse() {
        assert_eq!("12,34".parse::<Point>(), Ok(Point { x: 12, y: 34 }));
        assert_eq!(" 1 , 2 ".parse::<Point>(), Ok(Point { x: 1, y: 2 }));
        assert!("12".parse::<Point>().is_err());
        assert!("-1,2".parse::<Point>().is_err());
    }

    #[test]
    fn test_parse_select_clicks() {
        let cli = parse(&["sprite-slicer", "select", "a.png", "--click", "1,2", "--click", "3,4"]);
        match cli.command {
            Command::Select { clicks, .. } => {
                assert_eq!(clicks, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_range() {
        let cli = parse(&["sprite-slicer", "pack", "a.png", "--out", "o.png", "--start", "-3"]);
        match cli.command {
            Command::Pack { range, .. } => assert_eq!((range.start, range.end), (-3, 0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_pack_writes_canvas() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let sheet = write_sheet(dir.path());
        let out = dir.path().join("canvas.png");

        let cli = parse(&[
            "sprite-slicer",
            "pack",
            sheet.to_str().expect("utf-8 path"),
            "--out",
            out.to_str().expect("utf-8 path"),
        ]);
        let Command::Pack {
            sheet,
            range,
            out,
            display,
        } = cli.command
        else {
            panic!("expected pack");
        };
        pack(SlicerConfig::default(), &sheet, &range, &out, display).expect("pack");

        // 8 frames -> 3 cells per side
        let canvas = image::open(&out).expect("open canvas");
        assert_eq!((canvas.width(), canvas.height()), (96, 96));
    }

    #[test]
    fn test_export_command() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let sheet = write_sheet(dir.path());
        let args = SheetArgs {
            sheet,
            frame_width: None,
            frame_height: None,
        };
        let range = RangeArgs { start: 2, end: 4 };

        export(
            SlicerConfig::default(),
            &args,
            &range,
            dir.path().to_path_buf(),
            "hero".to_string(),
            "run".to_string(),
        )
        .expect("export");

        for n in 0..3 {
            assert!(dir.path().join(format!("hero/run/run_{n}.png")).is_file());
        }
    }

    #[test]
    fn test_export_without_names_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let args = SheetArgs {
            sheet: write_sheet(dir.path()),
            frame_width: None,
            frame_height: None,
        };
        let range = RangeArgs { start: 0, end: 0 };

        let err = export(
            SlicerConfig::default(),
            &args,
            &range,
            dir.path().to_path_buf(),
            String::new(),
            String::new(),
        )
        .expect_err("export should fail");
        assert!(matches!(
            err.downcast_ref::<SlicerError>(),
            Some(SlicerError::MissingExportFields)
        ));
    }

    #[test]
    fn test_preview_writes_frames() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let out_dir = dir.path().join("frames");
        let args = SheetArgs {
            sheet: write_sheet(dir.path()),
            frame_width: None,
            frame_height: None,
        };
        let range = RangeArgs { start: 0, end: 1 };

        preview(
            SlicerConfig::default(),
            &args,
            &range,
            Some(120),
            3,
            Some(out_dir.clone()),
        )
        .expect("preview");

        assert!(out_dir.join("preview_0000.png").is_file());
        assert!(out_dir.join("preview_0002.png").is_file());
    }

    #[test]
    fn test_missing_sheet_fails() {
        let args = SheetArgs {
            sheet: PathBuf::from("/nonexistent/sheet.png"),
            frame_width: None,
            frame_height: None,
        };
        let err = inspect(SlicerConfig::default(), &args).expect_err("inspect should fail");
        assert!(matches!(
            err.downcast_ref::<SlicerError>(),
            Some(SlicerError::InvalidPath(_))
        ));
    }
}
