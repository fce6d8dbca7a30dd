use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixelplace::models::{find_preset, AppConfig, CensusReport, ProcessingSettings, PRESETS};
use pixelplace::rendering::{fit_size, load_image, save_png};
use pixelplace::services::{ImagePipeline, TaskRunner};

#[derive(Parser)]
#[command(name = "pixelplace")]
#[command(about = "Convert images into palette-constrained pixel art for placement canvases")]
struct Cli {
    /// YAML config file (defaults to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and print how many pixels of each color it needs
    Convert(ConvertArgs),
    /// List built-in palettes, or the colors of one palette
    Palettes {
        /// Preset to show in detail
        name: Option<String>,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Source image (any format the image crate can decode)
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    /// Also write the tone-adjusted source to this PNG
    #[arg(long)]
    adjusted_output: Option<PathBuf>,

    /// Target width in pixels (keeps aspect ratio if --height is omitted)
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels (keeps aspect ratio if --width is omitted)
    #[arg(long)]
    height: Option<u32>,

    /// Brightness 0-100, 50 is unchanged
    #[arg(long)]
    brightness: Option<f32>,

    /// Contrast 0-100, 50 is unchanged
    #[arg(long)]
    contrast: Option<f32>,

    /// Saturation 0-100, 50 is unchanged
    #[arg(long)]
    saturation: Option<f32>,

    /// Dither strength 0-100, 0 is nearest color only
    #[arg(long)]
    dither: Option<f32>,

    /// Color distance: rgb, ciede2000 or oklab
    #[arg(long)]
    metric: Option<String>,

    /// Built-in palette name (see `pixelplace palettes`)
    #[arg(long, conflicts_with = "colors")]
    palette: Option<String>,

    /// Palette as comma-separated hex RGB (e.g. "#000000,#FFFFFF,#ED1C24")
    #[arg(long)]
    colors: Option<String>,

    /// Color that becomes transparent in the output (e.g. "#9EBDFF")
    #[arg(long)]
    terrain: Option<String>,

    /// Resize with nearest-neighbour sampling
    #[arg(long)]
    pixel_mode: bool,

    /// Seconds per placed pixel, adds a time estimate to the census
    #[arg(long)]
    seconds_per_pixel: Option<f64>,

    /// Print the census as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Convert(args)) => run_convert_command(args, config_file).await,
        Some(Commands::Palettes { name }) => run_palettes_command(name.as_deref()),
        None => {
            run_status_command(config_file);
            Ok(())
        }
    }
}

/// Run the full pipeline on one image
async fn run_convert_command(
    args: ConvertArgs,
    config_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelplace=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let mut config = AppConfig::load(config_file.as_deref());
    apply_overrides(&mut config, &args);

    let source = load_image(&args.input)?;
    let (width, height) = fit_size(source.width(), source.height(), args.width, args.height);
    let settings = ProcessingSettings::from_config(&config, width, height)?;
    let seconds_per_pixel = config.resolve_seconds_per_pixel()?;

    let pipeline = ImagePipeline::new(Arc::new(TaskRunner::new()));
    let show_progress = !args.json;
    let output = pipeline
        .process(source, &settings, move |phase, pct| {
            if show_progress {
                eprint!("\r{phase:<8} {pct:>3}%");
                let _ = std::io::stderr().flush();
            }
        })
        .await?
        .completed()
        .ok_or_else(|| anyhow::anyhow!("Conversion was superseded"))?;
    if show_progress {
        eprintln!();
    }

    let written = save_png(&output.quantized, &args.output)?;
    if let Some(path) = &args.adjusted_output {
        save_png(&output.adjusted, path)?;
    }

    let report = CensusReport::from_output(&output, settings.terrain)
        .with_seconds_per_pixel(seconds_per_pixel);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wrote {} ({written} bytes)", args.output.display());
        print!("{}", report.to_text());
    }

    Ok(())
}

/// Command-line flags win over the config file
fn apply_overrides(config: &mut AppConfig, args: &ConvertArgs) {
    if let Some(v) = args.brightness {
        config.brightness = v;
    }
    if let Some(v) = args.contrast {
        config.contrast = v;
    }
    if let Some(v) = args.saturation {
        config.saturation = v;
    }
    if let Some(v) = args.dither {
        config.dither = v;
    }
    if let Some(metric) = &args.metric {
        config.metric = metric.clone();
    }
    if let Some(name) = &args.palette {
        config.palette = name.clone();
        config.colors = None;
    }
    if let Some(colors) = &args.colors {
        config.colors = Some(
            colors
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        );
    }
    if let Some(terrain) = &args.terrain {
        config.terrain = Some(terrain.clone());
    }
    if args.pixel_mode {
        config.pixel_mode = true;
    }
    if args.seconds_per_pixel.is_some() {
        config.seconds_per_pixel = args.seconds_per_pixel;
    }
}

/// List presets
fn run_palettes_command(name: Option<&str>) -> anyhow::Result<()> {
    if let Some(name) = name {
        let preset =
            find_preset(name).ok_or_else(|| anyhow::anyhow!("Unknown palette preset: {name}"))?;
        println!("{} - {}\n", preset.name, preset.description);
        for (rgb, color) in preset.colors {
            println!("  {rgb}  {color}");
        }
        return Ok(());
    }

    println!("Built-in palettes:\n");
    for preset in PRESETS {
        println!(
            "  {:<10} {:>2} colors  {}",
            preset.name,
            preset.colors.len(),
            preset.description
        );
    }
    println!("\nRun 'pixelplace palettes <name>' to list a palette's colors.");
    Ok(())
}

/// Display status and configuration information
fn run_status_command(config_file: Option<PathBuf>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Pixelplace v{VERSION}");
    println!("Palette-constrained pixel art for placement canvases\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        std::env::var("CONFIG_FILE").as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        std::env::var("RUST_LOG")
            .as_deref()
            .unwrap_or("(not set, pixelplace=warn)")
    );

    let config_source = match &config_file {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("defaults ({} not found)", path.display()),
        None => "defaults".to_string(),
    };
    let config = AppConfig::load(config_file.as_deref());

    println!("\nConfiguration:");
    println!("  Source:     {config_source}");
    println!(
        "  Palette:    {}",
        match &config.colors {
            Some(colors) => format!("{} custom colors", colors.len()),
            None => config.palette.clone(),
        }
    );
    println!("  Metric:     {}", config.metric);
    println!(
        "  Tone:       brightness {}, contrast {}, saturation {}",
        config.brightness, config.contrast, config.saturation
    );
    println!("  Dither:     {}", config.dither);
    println!(
        "  Terrain:    {}",
        config.terrain.as_deref().unwrap_or("(none)")
    );
    println!("  Pixel mode: {}", config.pixel_mode);
    println!(
        "  Rate:       {}",
        config
            .seconds_per_pixel
            .map(|rate| format!("{rate}s per pixel"))
            .unwrap_or_else(|| "(no time estimate)".to_string())
    );

    println!("\nCommands:");
    println!("  pixelplace convert    Convert an image to palette pixel art");
    println!("  pixelplace palettes   List built-in palettes");
    println!("\nRun 'pixelplace --help' for more details.");
}
