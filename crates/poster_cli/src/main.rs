mod svg;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use poster_layout::{
    CanvasSize, LayoutConfig, MetricMeasurer, ModuleInput, PosterLayout, PosterSession,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out text posters on randomly chosen grids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a single poster layout
    Generate(GenerateArgs),
    /// Re-fit a saved layout to a new canvas size
    Refit(RefitArgs),
    /// Generate many poster variations into a directory
    Batch(BatchArgs),
    /// List the grid catalog
    Grids(GridsArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    text: TextFields,
    #[command(flatten)]
    settings: LayoutSettings,
    /// Canvas width in px (defaults to the configured width)
    #[arg(long)]
    width: Option<f32>,
    /// Canvas height in px (defaults to the configured height)
    #[arg(long)]
    height: Option<f32>,
    /// Write the layout JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write an SVG preview
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RefitArgs {
    /// Layout JSON written by `generate` or `batch`
    input: PathBuf,
    #[command(flatten)]
    settings: LayoutSettings,
    /// New canvas width in px
    #[arg(long)]
    width: f32,
    /// New canvas height in px; derived from the aspect ratio when omitted
    #[arg(long)]
    height: Option<f32>,
    /// Write the layout JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write an SVG preview
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    #[command(flatten)]
    text: TextFields,
    #[command(flatten)]
    settings: LayoutSettings,
    /// Output directory for layout files
    #[arg(short, long)]
    out_dir: PathBuf,
    /// Number of posters to generate
    #[arg(long, default_value_t = 10)]
    count: u32,
    /// Write an SVG preview next to every layout
    #[arg(long, default_value_t = false)]
    svg: bool,
}

#[derive(Parser, Debug)]
struct GridsArgs {
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug, Clone)]
struct TextFields {
    /// Headline text
    #[arg(long)]
    headline: Option<String>,
    /// Subline text
    #[arg(long)]
    sub: Option<String>,
    /// Info text
    #[arg(long)]
    info: Option<String>,
    /// Date text
    #[arg(long)]
    date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
struct LayoutSettings {
    /// TOML file overriding the layout defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Refit(args) => refit(args),
        Commands::Batch(args) => batch(args),
        Commands::Grids(args) => grids(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.settings.load_config()?;
    let mut rng = args.settings.rng();
    let measurer = MetricMeasurer::default();

    let size = CanvasSize::new(
        args.width.unwrap_or(config.canvas.width),
        args.height.unwrap_or(config.canvas.height),
    );
    let mut session = PosterSession::new(config, &mut rng);
    session.set_size(size)?;

    let layout = session.generate(&args.text.to_input(), &measurer, &mut rng)?;
    write_layout(&layout, args.output.as_deref())?;
    if let Some(path) = &args.svg {
        write_svg(&layout, path)?;
    }
    Ok(())
}

fn refit(args: RefitArgs) -> Result<()> {
    let config = args.settings.load_config()?;
    let mut rng = args.settings.rng();
    let measurer = MetricMeasurer::default();

    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {:?}", args.input))?;
    let layout: PosterLayout = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse layout {:?}", args.input))?;

    let mut session = PosterSession::restore(config, layout, &mut rng)?;
    match args.height {
        Some(height) => session.resize(CanvasSize::new(args.width, height), &measurer)?,
        None => {
            let size = session.resize_from_drag(args.width, None, &measurer)?;
            info!("aspect-locked resize to {}x{}px", size.width, size.height);
        },
    }

    let layout = session.layout();
    write_layout(&layout, args.output.as_deref())?;
    if let Some(path) = &args.svg {
        write_svg(&layout, path)?;
    }
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let config = args.settings.load_config()?;
    let mut rng = args.settings.rng();
    let measurer = MetricMeasurer::default();
    let input = args.text.to_input();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let mut session = PosterSession::new(config, &mut rng);
    let progress = ProgressBar::new(u64::from(args.count));
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} posters",
        )?
        .progress_chars("=> "),
    );

    for index in 0..args.count {
        let layout = session
            .generate(&input, &measurer, &mut rng)
            .with_context(|| format!("failed to generate poster {}", index))?;

        let layout_path = args.out_dir.join(format!("poster_{:04}.json", index));
        write_layout(&layout, Some(&layout_path))?;
        if args.svg {
            write_svg(&layout, &layout_path.with_extension("svg"))?;
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!("Posters written to {:?}", args.out_dir));
    Ok(())
}

fn grids(args: GridsArgs) -> Result<()> {
    let config = args.settings.load_config()?;
    let mut rng = args.settings.rng();
    let session = PosterSession::new(config, &mut rng);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (index, grid) in session.grids().shapes().iter().enumerate() {
        writeln!(
            out,
            "{:>4}  {:<14} {:>2} cols  {:>2} rows",
            index, grid.name, grid.cols, grid.rows
        )?;
    }
    Ok(())
}

fn write_layout(layout: &PosterLayout, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {:?}", path))?;
            serde_json::to_writer_pretty(file, layout)
                .with_context(|| format!("failed to write layout {:?}", path))?;
        },
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, layout)?;
            writeln!(out)?;
        },
    }
    Ok(())
}

fn write_svg(layout: &PosterLayout, path: &Path) -> Result<()> {
    let document = svg::render(layout).context("failed to render SVG preview")?;
    fs::write(path, document).with_context(|| format!("failed to write {:?}", path))
}

impl LayoutSettings {
    fn load_config(&self) -> Result<LayoutConfig> {
        match &self.config {
            Some(path) => LayoutConfig::load(path)
                .with_context(|| format!("failed to load config {:?}", path)),
            None => Ok(LayoutConfig::default()),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl TextFields {
    fn to_input(&self) -> ModuleInput {
        ModuleInput {
            headline: self.headline.clone(),
            sub: self.sub.clone(),
            info: self.info.clone(),
            date: self.date.clone(),
        }
    }
}
