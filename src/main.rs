use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use docbrand_pdf::{Document, FontConfig, FontSource, LayoutConfig};

/// Render a sectioned JSON document into a branded, paginated PDF.
#[derive(Parser)]
#[command(name = "docbrand-pdf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON document with `brandName`, optional `coverSubtitle` and `sections`
    input: PathBuf,

    /// Output PDF (defaults to the input path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the document's brand name
    #[arg(long)]
    brand: Option<String>,

    #[arg(long, default_value_t = docbrand_pdf::DEFAULT_MARGIN)]
    margin: f32,

    #[arg(long, default_value_t = docbrand_pdf::A4_WIDTH)]
    page_width: f32,

    #[arg(long, default_value_t = docbrand_pdf::A4_HEIGHT)]
    page_height: f32,

    /// Height of the footer zone kept free of content
    #[arg(long, default_value_t = docbrand_pdf::DEFAULT_FOOTER_RESERVED)]
    footer_height: f32,

    /// TrueType font for regular text (Helvetica when omitted)
    #[arg(long)]
    regular_font: Option<PathBuf>,

    /// TrueType font for bold text (Helvetica-Bold when omitted)
    #[arg(long)]
    bold_font: Option<PathBuf>,

    /// Date printed on the cover, as YYYY-MM-DD (today when omitted)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn font_source(path: Option<&PathBuf>) -> std::io::Result<FontSource> {
    match path {
        Some(p) => Ok(FontSource::TrueType(std::fs::read(p)?)),
        None => Ok(FontSource::Helvetica),
    }
}

fn run(cli: Cli) -> Result<PathBuf, docbrand_pdf::Error> {
    let config = LayoutConfig {
        page_width: cli.page_width,
        page_height: cli.page_height,
        margin: cli.margin,
        footer_reserved_height: cli.footer_height,
        fonts: FontConfig {
            regular: font_source(cli.regular_font.as_ref())?,
            bold: font_source(cli.bold_font.as_ref())?,
        },
        generated_on: cli.date,
    };

    let mut doc = Document::from_json(&std::fs::read(&cli.input)?)?;
    if let Some(brand) = cli.brand {
        doc.brand_name = brand;
    }

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("pdf"));
    let bytes = docbrand_pdf::render(&doc, &config)?;
    std::fs::write(&output, bytes)?;
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            log::info!("Converted -> {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
