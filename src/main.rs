use anyhow::{anyhow, Context, Result};
use clap::Parser;
use scatterplot::interaction::{self, PointerEvent};
use scatterplot::{data::PlotData, runtime, ChartConfig, OutputFormat};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "scatterplot")]
#[command(
    about = "Render a penguin scatterplot (flipper length vs body mass) from a CSV file",
    long_about = None
)]
struct Args {
    /// Delimited data file with a header row (.csv, .tsv) or a JSON array of objects
    #[arg(default_value = "penglings.csv")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format, overriding the config file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// JSON chart configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Chart title drawn in the top margin
    #[arg(long)]
    title: Option<String>,

    /// Draw a species legend
    #[arg(long)]
    legend: bool,

    /// Print the tooltip shown for a pointer at canvas position X,Y instead of rendering
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    hover: Option<(f64, f64)>,
}

fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();
    let config = load_config(&args)?;

    if let Err(err) = run(&args, &config) {
        error!("{:#}", err);
        if args.hover.is_none() {
            let document = runtime::render_failure(&err, &config)
                .context("Failed to render error output")?;
            write_output(args.output.as_deref(), &document)?;
        } else {
            eprintln!("Error: {:#}", err);
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: &Args, config: &ChartConfig) -> Result<()> {
    let data = PlotData::from_path(&args.input)?;
    let scene = runtime::build_scene(&data, config)?;

    if let Some((x, y)) = args.hover {
        let state = interaction::replay([PointerEvent::Move { x, y }], &scene.marks);
        match state.visible() {
            Some(active) => println!("{}", active.content),
            None => println!("No mark at {},{}", x, y),
        }
        return Ok(());
    }

    let bytes = runtime::render_scene(&scene, config)?;
    write_output(args.output.as_deref(), &bytes)
}

fn load_config(args: &Args) -> Result<ChartConfig> {
    let mut config = match &args.config {
        Some(path) => ChartConfig::from_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.title.is_some() {
        config.title = args.title.clone();
    }
    if args.legend {
        config.legend = true;
    }
    config.validate().context("Invalid chart configuration")?;
    Ok(config)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write '{}'", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")
        }
    }
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", v, e))
    };
    Ok((parse(x)?, parse(y)?))
}

/// Logs go to stderr; stdout may carry image bytes. Level via `RUST_LOG`, default `info`.
fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("Failed to create env filter: {e}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {e}"))?;
    Ok(())
}
