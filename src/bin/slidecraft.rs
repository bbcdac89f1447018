use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use slidecraft::{
    CpuRenderer, FontBook, FontWeight, FsImageSource, ImageCache, LegacySlide, RendererOpts,
    Slide, migrate_legacy, repair_slides, validate_slides,
};

#[derive(Parser, Debug)]
#[command(name = "slidecraft", version)]
struct Cli {
    /// Verbose logging (`RUST_LOG` is honoured).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render slides of a deck to 1080×1080 PNG files.
    Export(ExportArgs),
    /// Convert a legacy flat slide list into a layered deck.
    Migrate(MigrateArgs),
    /// Check a deck against the document invariants, optionally writing a repaired copy.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input deck JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; files are named `slide-NN.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Export only this 1-based slide number.
    #[arg(long)]
    slide: Option<u32>,

    /// Image root directory. Defaults to `SLIDECRAFT_IMAGE_ROOT`, else the deck's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Font file to register, as `PATH` or `PATH:WEIGHT`. Repeatable; the first one also
    /// draws text whose family was not registered.
    #[arg(long = "font")]
    fonts: Vec<String>,
}

#[derive(Parser, Debug)]
struct MigrateArgs {
    /// Legacy slide list JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output deck JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input deck JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write a repaired deck here.
    #[arg(long)]
    repair_out: Option<PathBuf>,
}

/// On-disk deck: `{"slides": [...]}` or a bare slide array.
#[derive(Debug, Serialize)]
struct Deck {
    slides: Vec<Slide>,
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Wrapped { slides: Vec<Slide> },
            Bare(Vec<Slide>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Wrapped { slides } | Repr::Bare(slides) => Deck { slides },
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Migrate(args) => cmd_migrate(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse '{}'", path.display()))
}

fn write_deck(path: &Path, slides: Vec<Slide>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&Deck { slides })?;
    std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))
}

fn parse_font_arg(arg: &str) -> anyhow::Result<(PathBuf, FontWeight)> {
    match arg.rsplit_once(':') {
        Some((path, weight)) if !path.is_empty() && weight.chars().all(|c| c.is_ascii_digit()) => {
            let w: u16 = weight
                .parse()
                .with_context(|| format!("font weight in '{arg}'"))?;
            Ok((PathBuf::from(path), FontWeight(w)))
        }
        _ => Ok((PathBuf::from(arg), FontWeight::NORMAL)),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let deck: Deck = read_json(&args.in_path)?;
    let (slides, report) = repair_slides(deck.slides);
    if !report.is_clean() {
        eprintln!("note: deck was repaired before export ({report:?})");
    }

    let source = match args.assets {
        Some(root) => FsImageSource::new(root),
        None if std::env::var("SLIDECRAFT_IMAGE_ROOT").is_ok() => FsImageSource::from_env(),
        None => FsImageSource::new(
            args.in_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new(".")),
        ),
    };

    let mut fonts = FontBook::new();
    for arg in &args.fonts {
        let (path, weight) = parse_font_arg(arg)?;
        let family = fonts
            .register_file(&path, weight)
            .with_context(|| format!("register font '{}'", path.display()))?;
        eprintln!("font {family} ({}) from {}", weight.0, path.display());
    }

    let mut renderer = CpuRenderer::new(
        ImageCache::new(Arc::new(source)),
        fonts,
        RendererOpts::default(),
    );

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let selected: Vec<&Slide> = slides
        .iter()
        .filter(|s| args.slide.is_none_or(|n| s.slide_number == n))
        .collect();
    if selected.is_empty() {
        anyhow::bail!("no slide numbered {:?} in deck", args.slide);
    }

    for slide in selected {
        let png = renderer
            .export_flat(slide)
            .with_context(|| format!("render slide {}", slide.slide_number))?;
        let out = args.out_dir.join(format!("slide-{:02}.png", slide.slide_number));
        std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_migrate(args: MigrateArgs) -> anyhow::Result<()> {
    let legacy: Vec<LegacySlide> = read_json(&args.in_path)?;
    let slides = migrate_legacy(&legacy);
    let count = slides.len();
    write_deck(&args.out, slides)?;
    eprintln!("migrated {count} slides to {}", args.out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let deck: Deck = read_json(&args.in_path)?;
    let Err(err) = validate_slides(&deck.slides) else {
        eprintln!("{}: ok ({} slides)", args.in_path.display(), deck.slides.len());
        return Ok(());
    };
    let Some(out) = args.repair_out else {
        return Err(anyhow::Error::from(err))
            .with_context(|| format!("validate '{}'", args.in_path.display()));
    };
    eprintln!("{}: {err}; repairing", args.in_path.display());
    let (slides, report) = repair_slides(deck.slides);
    write_deck(&out, slides)?;
    eprintln!("wrote {} ({report:?})", out.display());
    Ok(())
}
