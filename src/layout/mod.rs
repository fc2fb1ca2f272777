//! Turns a [`Document`] into positioned text on fixed-size pages.
//!
//! Coordinates here are top-down points (y grows towards the page bottom);
//! the PDF writer flips them. Every [`PlacedText`] carries its complete
//! style, so nothing drawn can inherit font, size or color from a
//! neighbour.

mod classify;
mod inline;
mod paginate;

use chrono::NaiveDate;

use crate::config::{LayoutConfig, PageGeometry};
use crate::error::{Error, RenderError};
use crate::fonts::{Fonts, Weight};
use crate::model::{Document, Section};

pub use classify::{LineKind, classify_line};
pub use inline::{StyledRun, parse_styled_runs};

use classify::{BLANK_GAP, BODY_LINE, BULLET, BlockSpacing, HEADING2, HEADING3};
use inline::{draw_runs, wrap_runs, wrap_text};
use paginate::Paginator;

pub type Rgb = [u8; 3];

pub const BODY_COLOR: Rgb = [0, 0, 0];
pub const FOOTER_COLOR: Rgb = [128, 128, 128];
const HEADING_COLOR: Rgb = [0x2c, 0x3e, 0x50];
const SUBTITLE_COLOR: Rgb = [0x66, 0x66, 0x66];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub weight: Weight,
    pub size: f32,
    pub color: Rgb,
}

const fn style(weight: Weight, size: f32, color: Rgb) -> TextStyle {
    TextStyle {
        weight,
        size,
        color,
    }
}

pub const BODY_STYLE: TextStyle = style(Weight::Regular, 12.0, BODY_COLOR);
pub const HEADING2_STYLE: TextStyle = style(Weight::Bold, 18.0, HEADING_COLOR);
pub const HEADING3_STYLE: TextStyle = style(Weight::Bold, 14.0, HEADING_COLOR);
pub const FOOTER_STYLE: TextStyle = style(Weight::Regular, 10.0, FOOTER_COLOR);
const TITLE_STYLE: TextStyle = style(Weight::Bold, 24.0, BODY_COLOR);
const SUBTITLE_STYLE: TextStyle = style(Weight::Regular, 16.0, SUBTITLE_COLOR);
const BRAND_STYLE: TextStyle = style(Weight::Bold, 36.0, BODY_COLOR);
const COVER_SUBTITLE_STYLE: TextStyle = style(Weight::Regular, 20.0, BODY_COLOR);
const DATE_STYLE: TextStyle = style(Weight::Regular, 12.0, SUBTITLE_COLOR);

const TITLE_LINE: f32 = 30.0;
const TITLE_GAP: f32 = 6.0;
const SUBTITLE_LINE: f32 = 20.0;
const SECTION_HEADER_GAP: f32 = 20.0;
const BULLET_INDENT: f32 = 10.0;

const COVER_TOP_RATIO: f32 = 0.3;
const BRAND_LINE: f32 = 44.0;
const BRAND_GAP: f32 = 20.0;
const COVER_SUBTITLE_LINE: f32 = 26.0;
const COVER_DATE_GAP: f32 = 30.0;
const DATE_LINE: f32 = 16.0;

/// Smallest content area that holds every fixed-height block, a one-line
/// title with its subtitle, and a cover with one-line brand and subtitle.
pub(crate) fn min_content_height() -> f32 {
    [
        HEADING2.total(),
        HEADING3.total(),
        BULLET.total(),
        BODY_LINE,
        TITLE_LINE + TITLE_GAP + SUBTITLE_LINE,
        BRAND_LINE + BRAND_GAP + COVER_SUBTITLE_LINE + COVER_DATE_GAP + DATE_LINE,
    ]
    .into_iter()
    .fold(0.0, f32::max)
}

/// One string drawn at a fixed position. `baseline` is measured from the page top.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub texts: Vec<PlacedText>,
    /// Page-number annotation; `None` on the cover.
    pub footer: Option<PlacedText>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub title: String,
    pub generated_on: NaiveDate,
    pub pages: Vec<Page>,
}

pub fn layout_document(doc: &Document, config: &LayoutConfig) -> Result<LaidOutDocument, Error> {
    let fonts = Fonts::load(&config.fonts)?;
    layout_with_fonts(doc, config, &fonts)
}

pub(crate) fn layout_with_fonts(
    doc: &Document,
    config: &LayoutConfig,
    fonts: &Fonts,
) -> Result<LaidOutDocument, Error> {
    let geometry = config.geometry()?;
    let generated_on = config.generation_date();

    let mut assembler = Assembler {
        geometry,
        fonts,
        pager: Paginator::new(geometry),
    };
    assembler.cover(doc, generated_on)?;
    for (idx, section) in doc.sections.iter().enumerate() {
        assembler.section(idx + 1, section)?;
    }

    let mut pages = assembler.pager.finish();
    stamp_footers(&mut pages, &geometry, fonts)?;

    Ok(LaidOutDocument {
        geometry,
        title: doc.cover_brand(),
        generated_on,
        pages,
    })
}

struct Assembler<'f, 'a> {
    geometry: PageGeometry,
    fonts: &'f Fonts<'a>,
    pager: Paginator,
}

impl Assembler<'_, '_> {
    /// The cover never breaks. Its stack starts at 30% of the page height,
    /// or higher when that would run into the footer zone.
    fn cover(&mut self, doc: &Document, generated_on: NaiveDate) -> Result<(), Error> {
        self.pager.begin_cover();
        let width = self.geometry.usable_width;
        let brand = wrap_text(&doc.cover_brand(), BRAND_STYLE.weight, BRAND_STYLE.size, width, self.fonts)?;
        let subtitle = wrap_text(
            &doc.cover_subtitle(),
            COVER_SUBTITLE_STYLE.weight,
            COVER_SUBTITLE_STYLE.size,
            width,
            self.fonts,
        )?;
        let date = generated_on.format("%B %-d, %Y").to_string();

        let needed = brand.len() as f32 * BRAND_LINE
            + BRAND_GAP
            + subtitle.len() as f32 * COVER_SUBTITLE_LINE
            + COVER_DATE_GAP
            + DATE_LINE;
        let bottom = self.geometry.effective_content_height();
        let available = bottom - self.geometry.margin;
        if needed > available {
            return Err(RenderError::CoverOverflow { needed, available }.into());
        }
        let top = (self.geometry.page_height * COVER_TOP_RATIO)
            .min(bottom - needed)
            .max(self.geometry.margin);
        self.pager.advance(top - self.geometry.margin);

        self.draw_centered(brand, BRAND_STYLE, BRAND_LINE, false)?;
        self.pager.advance(BRAND_GAP);
        self.draw_centered(subtitle, COVER_SUBTITLE_STYLE, COVER_SUBTITLE_LINE, false)?;
        self.pager.advance(COVER_DATE_GAP);
        self.draw_centered(vec![date], DATE_STYLE, DATE_LINE, false)?;
        Ok(())
    }

    fn section(&mut self, number: usize, section: &Section) -> Result<(), Error> {
        self.pager.begin_section(number);
        log::debug!(
            "laying out section #{} {:?} ({:?})",
            section.section_number,
            section.title,
            self.pager.phase(),
        );

        self.centered(&section.title, TITLE_STYLE, TITLE_LINE, true)?;
        self.pager.advance(TITLE_GAP);
        self.centered(&section.subtitle, SUBTITLE_STYLE, SUBTITLE_LINE, true)?;
        self.pager.advance(SECTION_HEADER_GAP);

        for line in section.content.lines() {
            self.content_line(classify_line(line))?;
        }
        Ok(())
    }

    /// Word-wrap `text` and center each wrapped line on its own.
    fn centered(&mut self, text: &str, style: TextStyle, line_h: f32, fit_check: bool) -> Result<(), Error> {
        let lines = wrap_text(text, style.weight, style.size, self.geometry.usable_width, self.fonts)?;
        self.draw_centered(lines, style, line_h, fit_check)
    }

    fn draw_centered(
        &mut self,
        lines: Vec<String>,
        style: TextStyle,
        line_h: f32,
        fit_check: bool,
    ) -> Result<(), Error> {
        let width = self.geometry.usable_width;
        for line in lines {
            if fit_check {
                self.pager.ensure_space(line_h);
            }
            let line_w = self.fonts.measure(&line, style.weight, style.size)?;
            let x = self.geometry.margin + (width - line_w).max(0.0) / 2.0;
            let baseline = self.pager.y() + style.size;
            self.pager.page().texts.push(PlacedText {
                x,
                baseline,
                text: line,
                style,
            });
            self.pager.advance(line_h);
        }
        Ok(())
    }

    fn content_line(&mut self, kind: LineKind) -> Result<(), Error> {
        if let Some(h) = kind.reserved_height() {
            self.pager.ensure_space(h);
        }
        let margin = self.geometry.margin;
        match kind {
            LineKind::Heading2(text) => self.heading(text, HEADING2, HEADING2_STYLE),
            LineKind::Heading3(text) => self.heading(text, HEADING3, HEADING3_STYLE),
            LineKind::Bullet(text) => {
                let runs = parse_styled_runs(&format!("\u{2022} {text}"));
                let baseline = self.pager.y() + BULLET.before + BODY_STYLE.size;
                draw_runs(
                    &mut self.pager.page().texts,
                    &runs,
                    margin + BULLET_INDENT,
                    baseline,
                    BODY_STYLE,
                    self.fonts,
                )?;
                self.pager.advance(BULLET.total());
                Ok(())
            }
            LineKind::Blank => {
                self.pager.advance(BLANK_GAP);
                Ok(())
            }
            LineKind::Paragraph(text) => {
                let runs = parse_styled_runs(text);
                let lines = wrap_runs(
                    &runs,
                    BODY_STYLE.weight,
                    BODY_STYLE.size,
                    self.geometry.usable_width,
                    self.fonts,
                )?;
                for line in lines {
                    self.pager.ensure_space(BODY_LINE);
                    let baseline = self.pager.y() + BODY_STYLE.size;
                    draw_runs(&mut self.pager.page().texts, &line, margin, baseline, BODY_STYLE, self.fonts)?;
                    self.pager.advance(BODY_LINE);
                }
                Ok(())
            }
        }
    }

    fn heading(&mut self, text: &str, spacing: BlockSpacing, style: TextStyle) -> Result<(), Error> {
        self.pager.advance(spacing.before);
        let baseline = self.pager.y() + style.size;
        draw_runs(
            &mut self.pager.page().texts,
            &parse_styled_runs(text),
            self.geometry.margin,
            baseline,
            style,
            self.fonts,
        )?;
        self.pager.advance(spacing.line + spacing.after);
        Ok(())
    }
}

/// "Page i of n" on every page after the cover; the cover is not counted.
fn stamp_footers(pages: &mut [Page], geometry: &PageGeometry, fonts: &Fonts) -> Result<(), Error> {
    let numbered = pages.len().saturating_sub(1);
    for (idx, page) in pages.iter_mut().enumerate().skip(1) {
        let text = format!("Page {idx} of {numbered}");
        fonts.measure(&text, FOOTER_STYLE.weight, FOOTER_STYLE.size)?;
        page.footer = Some(PlacedText {
            x: geometry.margin,
            baseline: geometry.footer_baseline(),
            text,
            style: FOOTER_STYLE,
        });
    }
    Ok(())
}
