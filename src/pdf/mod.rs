use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::{Error, RenderError};
use crate::fonts::{Fonts, RegisteredFont, Weight, register_font};
use crate::layout::{LaidOutDocument, Page, PlacedText};

type FontTable = BTreeMap<Weight, RegisteredFont>;

pub(crate) fn write(doc: &LaidOutDocument, fonts: &Fonts) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: collect used characters per weight and register one font per weight
    let mut used_chars: BTreeMap<Weight, BTreeSet<char>> = BTreeMap::new();
    for text in doc.pages.iter().flat_map(page_texts) {
        used_chars
            .entry(text.style.weight)
            .or_default()
            .extend(text.text.chars().filter(|c| !c.is_control()));
    }
    for chars in used_chars.values_mut() {
        chars.insert(' ');
    }

    let mut registered: FontTable = BTreeMap::new();
    for (i, (weight, chars)) in used_chars.iter().enumerate() {
        let pdf_name = format!("F{}", i + 1);
        let entry = register_font(&mut pdf, fonts.face(*weight), pdf_name, &mut alloc, chars)?;
        registered.insert(*weight, entry);
    }

    let t_fonts = t0.elapsed();

    // Phase 2: page content streams
    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages.iter().enumerate() {
        let content = page_content(page, doc.geometry.page_height, &registered)?;
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    let t_content = t0.elapsed();

    // Phase 3: document structure
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let media_box = Rect::new(0.0, 0.0, doc.geometry.page_width, doc.geometry.page_height);
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(media_box)
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for entry in registered.values() {
            font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
        }
    }

    let date = doc.generated_on;
    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .producer(TextStr(concat!("docbrand-pdf ", env!("CARGO_PKG_VERSION"))))
        .creation_date(
            Date::new(date.year().clamp(0, 9999) as u16)
                .month(date.month() as u8)
                .day(date.day() as u8),
        );

    log::info!(
        "PDF phases: fonts={:.1}ms, content={:.1}ms, assembly={:.1}ms ({} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_content - t_fonts).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_content).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}

fn page_texts(page: &Page) -> impl Iterator<Item = &PlacedText> {
    page.texts.iter().chain(page.footer.iter())
}

fn page_content(page: &Page, page_height: f32, fonts: &FontTable) -> Result<Content, Error> {
    let mut content = Content::new();
    for text in &page.texts {
        show_text(&mut content, text, page_height, fonts)?;
    }
    if let Some(footer) = &page.footer {
        // The footer's gray fill lives inside its own graphics state.
        content.save_state();
        let shown = show_text(&mut content, footer, page_height, fonts);
        content.restore_state();
        shown?;
    }
    Ok(content)
}

fn show_text(
    content: &mut Content,
    text: &PlacedText,
    page_height: f32,
    fonts: &FontTable,
) -> Result<(), Error> {
    let font = fonts
        .get(&text.style.weight)
        .ok_or(RenderError::MissingFont(text.style.weight))?;
    let bytes = font.encode(&text.text)?;
    let [r, g, b] = text.style.color;
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content
        .begin_text()
        .set_font(Name(font.pdf_name.as_bytes()), text.style.size)
        .next_line(text.x, page_height - text.baseline)
        .show(Str(&bytes))
        .end_text();
    Ok(())
}
