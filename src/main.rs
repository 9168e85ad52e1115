mod checklist;
mod compose;
mod config;
mod error;
mod layout;
mod media;
mod pdf;
mod sink;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use checklist::to_checklist;
use compose::compose;
use config::{Overrides, RunConfig, Settings, default_fonts, load_settings};
use layout::FontMetrics;
use media::effective_edge;
use pdf::{FontRegistry, render, save};
use sink::{Dispatch, LprPrinter, Viewer};

/// Print a note or label with the text set as large as it fits.
#[derive(Parser, Debug)]
#[command(name = "print_note")]
#[command(about = "Print a note or label with the text set as large as it fits.", long_about = None)]
struct Args {
    /// Text to print, or a comma-separated list with --checklist
    input_string: String,

    /// Convert a comma-separated list to a checklist
    #[arg(short, long)]
    checklist: bool,

    /// Font id [default: Noto Sans Bold]
    #[arg(short, long)]
    font: Option<String>,

    /// Printer name [default: nemonic_MIP_201]
    #[arg(short, long)]
    printer: Option<String>,

    /// Media: note, label1, label2, label3, label4 or label0.5 [default: note]
    #[arg(short, long)]
    media: Option<String>,

    /// Location of the sticky edge: up, down, left or right [default: up]
    #[arg(short, long = "sticky_edge")]
    sticky_edge: Option<String>,

    /// Open the PDF in a viewer instead of printing
    #[arg(short, long)]
    dryrun: bool,

    /// Settings file (JSON) with defaults and font locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the PDF [default: <tmp>/printNote_temp.pdf]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let overrides = Overrides {
        font: args.font,
        printer: args.printer,
        media: args.media,
        sticky_edge: args.sticky_edge,
        output: args.output,
    };
    let config = RunConfig::resolve(overrides, settings)?;

    let text = if args.checklist {
        to_checklist(&args.input_string)
    } else {
        args.input_string
    };
    info!("{}", text);

    let mut registry = FontRegistry::new(&config.font_dirs);
    for (id, path) in default_fonts() {
        if path.exists() {
            registry.register(&id, &path)?;
        }
    }
    for (id, path) in &config.fonts {
        registry.register(id, path)?;
    }
    let font = registry.resolve(&config.font)?;

    let metrics = FontMetrics::new(font.face()?);
    let page = compose(config.media, &text, &metrics);

    let mut doc = render(&page, font)?;
    save(&mut doc, &config.output)?;

    info!("Processing time: {:.3} s", start_time.elapsed().as_secs_f64());

    if args.dryrun {
        Viewer.dispatch(&config.output)?;
    } else {
        let edge = effective_edge(config.media, config.sticky_edge);
        LprPrinter::new(&config.printer, edge).dispatch(&config.output)?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
