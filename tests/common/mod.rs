#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use docbrand_pdf::{Document, FontConfig, FontSource, LayoutConfig, Page, Section};

pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

/// A4 defaults with the cover date pinned.
pub fn a4_config() -> LayoutConfig {
    LayoutConfig {
        generated_on: Some(fixed_date()),
        ..Default::default()
    }
}

/// 400pt wide page, margin 50 and a 50pt footer zone, so the lowest content
/// y is `page_height - 50`. Section content starts at y = 126.
pub fn small_config(page_height: f32) -> LayoutConfig {
    LayoutConfig {
        page_width: 400.0,
        page_height,
        margin: 50.0,
        footer_reserved_height: 50.0,
        ..a4_config()
    }
}

/// DejaVu Sans Mono (see tests/fixtures/fonts/DejaVu-LICENSE) for both weights.
pub fn truetype_config() -> LayoutConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSansMono.ttf");
    let data = std::fs::read(path).unwrap();
    LayoutConfig {
        fonts: FontConfig {
            regular: FontSource::TrueType(data.clone()),
            bold: FontSource::TrueType(data),
        },
        ..a4_config()
    }
}

pub fn section(number: i64, title: &str, subtitle: &str, content: &str) -> Section {
    Section {
        section_number: number,
        title: title.into(),
        subtitle: subtitle.into(),
        content: content.into(),
    }
}

pub fn doc(brand: &str, sections: Vec<Section>) -> Document {
    Document {
        brand_name: brand.into(),
        cover_subtitle: None,
        sections,
    }
}

/// `n` one-line paragraphs: "line 1", "line 2", ...
pub fn body_lines(n: usize) -> String {
    (1..=n)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn texts(page: &Page) -> Vec<&str> {
    page.texts.iter().map(|t| t.text.as_str()).collect()
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Per-test scratch path under the system temp dir.
pub fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docbrand-pdf-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}
