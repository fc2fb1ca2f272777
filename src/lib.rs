mod config;
mod error;
mod fonts;
pub mod layout;
mod model;
mod pdf;

pub use config::{
    A4_HEIGHT, A4_WIDTH, DEFAULT_FOOTER_RESERVED, DEFAULT_MARGIN, FontConfig, FontSource,
    LayoutConfig, PageGeometry,
};
pub use error::{Error, RenderError};
pub use fonts::Weight;
pub use layout::{LaidOutDocument, Page, PlacedText, layout_document};
pub use model::{Document, Section};

use std::path::Path;
use std::time::Instant;

/// Lay out `doc` and serialize it as PDF bytes. Nothing is returned unless
/// every page rendered.
pub fn render(doc: &Document, config: &LayoutConfig) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let fonts = fonts::Fonts::load(&config.fonts)?;
    let laid_out = layout::layout_with_fonts(doc, config, &fonts)?;
    let t_layout = t0.elapsed();

    let bytes = pdf::write(&laid_out, &fonts)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, write={:.1}ms, total={:.1}ms ({} sections, {} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.sections.len(),
        laid_out.pages.len(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_json_bytes_to_pdf(input: &[u8], config: &LayoutConfig) -> Result<Vec<u8>, Error> {
    let doc = Document::from_json(input)?;
    render(&doc, config)
}

/// Read a JSON document from `input` and write the PDF to `output`.
/// `output` is left untouched when conversion fails.
pub fn convert_json_to_pdf(input: &Path, output: &Path, config: &LayoutConfig) -> Result<(), Error> {
    let t0 = Instant::now();

    let raw = std::fs::read(input)?;
    let bytes = convert_json_bytes_to_pdf(&raw, config)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Wrote {} ({} bytes): render={:.1}ms, write={:.1}ms",
        output.display(),
        bytes.len(),
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
    );

    Ok(())
}
