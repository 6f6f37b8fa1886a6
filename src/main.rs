use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cutout::inference::{self, MatteImage, MattingModel, OutputKind};
use cutout::{DisplayRect, EditorConfig, EditorSession, ProcessOutcome, Resample};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Filter used when fitting masks to the image
    #[arg(long, value_enum, default_value_t = ResampleArg::Bilinear, global = true)]
    resample: ResampleArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove the background using a matting model or a precomputed matte
    Remove(RemoveArgs),
    /// Cut out an image with a segmentation mask (white = removed)
    Segment(SegmentArgs),
    /// Keep only the regions covered by brush strokes
    Paint(PaintArgs),
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input image (PNG or JPEG)
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "processed-image.png")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Path to the matting model (ONNX file)
    #[arg(long, conflicts_with = "matte")]
    model: Option<PathBuf>,

    /// Precomputed grayscale matte (white = foreground)
    #[arg(long)]
    matte: Option<PathBuf>,

    /// Model input edge in pixels
    #[arg(long, default_value_t = cutout::config::DEFAULT_MODEL_INPUT)]
    input_size: u32,

    /// Write the resolved matte as a grayscale image instead of the cutout
    #[arg(long)]
    show_matte: bool,
}

#[derive(Args, Debug)]
struct SegmentArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Grayscale segmentation mask (white = masked-out class)
    #[arg(long)]
    mask: PathBuf,
}

#[derive(Args, Debug)]
struct PaintArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Brush radius in image pixels
    #[arg(long, default_value_t = cutout::config::DEFAULT_BRUSH_RADIUS)]
    radius: u32,

    /// Displayed size of the paint surface, WIDTHxHEIGHT (defaults to the image size)
    #[arg(long, value_parser = parse_size)]
    display: Option<(f32, f32)>,

    /// One stroke as display-space points, e.g. "10,10 40,12 80,30"
    #[arg(long = "stroke", required = true)]
    strokes: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ResampleArg {
    Nearest,
    Bilinear,
}

impl From<ResampleArg> for Resample {
    fn from(arg: ResampleArg) -> Self {
        match arg {
            ResampleArg::Nearest => Resample::Nearest,
            ResampleArg::Bilinear => Resample::Bilinear,
        }
    }
}

fn parse_size(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("display size must be positive, got {s:?}"));
    }
    Ok((w, h))
}

fn parse_stroke(s: &str) -> Result<Vec<(f32, f32)>> {
    s.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|p| !p.is_empty())
        .map(|p| -> Result<(f32, f32)> {
            let (x, y) = p
                .split_once(',')
                .with_context(|| format!("expected x,y point, got {p:?}"))?;
            let x: f32 = x.trim().parse().with_context(|| format!("bad x in {p:?}"))?;
            let y: f32 = y.trim().parse().with_context(|| format!("bad y in {p:?}"))?;
            Ok((x, y))
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = EditorConfig::default().resample(cli.resample.into());

    match cli.command {
        Command::Remove(args) => run_remove(config, args),
        Command::Segment(args) => run_segment(config, args),
        Command::Paint(args) => run_paint(config, args),
    }
}

fn open_session(config: EditorConfig, input: &Path) -> Result<EditorSession> {
    let mut session = EditorSession::new(config).context("Invalid editor configuration")?;
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    session
        .load_image(&bytes)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if let Some(image) = session.image() {
        tracing::info!("Input: {} ({}x{})", input.display(), image.width(), image.height());
    }
    Ok(session)
}

fn run_model(session: &mut EditorSession, model: &mut dyn MattingModel) -> Result<()> {
    let start = Instant::now();
    let outcome = session.process_with(model).context("Failed to process image")?;
    tracing::info!("Processed in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    if outcome == ProcessOutcome::Stale {
        bail!("image changed while processing");
    }
    Ok(())
}

fn write_output(session: &EditorSession, output: &Path) -> Result<()> {
    let encoded = session.export().context("Failed to encode output")?;
    std::fs::write(output, &encoded.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("Wrote {} ({}, {} bytes)", output.display(), encoded.mime_type, encoded.bytes.len());
    Ok(())
}

fn run_remove(config: EditorConfig, args: RemoveArgs) -> Result<()> {
    let config = config.model_input_size(args.input_size);
    let input_size = config.model_input_size;
    let mut session = open_session(config, &args.io.input)?;

    let mut model: Box<dyn MattingModel> = match (&args.model, &args.matte) {
        (Some(model_path), _) => {
            tracing::info!("Loading matting model from {}", model_path.display());
            inference::create_default_model(model_path, input_size)
                .context("Failed to load matting model")?
        }
        (None, Some(matte_path)) => Box::new(
            MatteImage::open(matte_path, OutputKind::Matte).context("Failed to load matte")?,
        ),
        (None, None) => bail!("either --model or --matte is required"),
    };
    tracing::debug!("Model input size: {:?}", model.input_size());

    if args.show_matte {
        let image = session.image().context("no image loaded")?;
        let output = model.infer(image).context("Failed to run model")?;
        let (width, height) = image.dimensions();
        let preview = cutout::MaskSource::from(output)
            .resolve(width, height, session.config().resample)
            .and_then(|opacity| opacity.to_preview())
            .context("Failed to resolve matte")?;
        let encoded = cutout::export::encode(&preview).context("Failed to encode matte")?;
        std::fs::write(&args.io.output, &encoded.bytes)
            .with_context(|| format!("Failed to write {}", args.io.output.display()))?;
        tracing::info!("Wrote matte preview to {}", args.io.output.display());
        return Ok(());
    }

    run_model(&mut session, &mut *model)?;
    write_output(&session, &args.io.output)
}

fn run_segment(config: EditorConfig, args: SegmentArgs) -> Result<()> {
    let mut session = open_session(config, &args.io.input)?;
    let mut model = MatteImage::open(&args.mask, OutputKind::Segmentation)
        .context("Failed to load segmentation mask")?;

    run_model(&mut session, &mut model)?;
    write_output(&session, &args.io.output)
}

fn run_paint(config: EditorConfig, args: PaintArgs) -> Result<()> {
    let mut session = open_session(config.brush_radius(args.radius), &args.io.input)?;
    let image = session.image().context("no image loaded")?;
    let (width, height) = args
        .display
        .unwrap_or((image.width() as f32, image.height() as f32));
    let rect = DisplayRect::new(0.0, 0.0, width, height);

    for stroke in &args.strokes {
        let points = parse_stroke(stroke)?;
        let Some((&(x, y), rest)) = points.split_first() else {
            continue;
        };
        tracing::debug!("Stroke with {} points", points.len());

        session.pointer_down(x, y, &rect);
        for &(x, y) in rest {
            session.pointer_move(x, y, &rect);
        }
        session.pointer_up();
    }

    session
        .apply_painted_mask()
        .context("Failed to apply painted mask")?;
    write_output(&session, &args.io.output)
}
