use std::fmt;

use chrono::NaiveDate;

use crate::error::Error;

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;
pub const DEFAULT_MARGIN: f32 = 50.0;
pub const DEFAULT_FOOTER_RESERVED: f32 = 60.0;

#[derive(Clone, Default)]
pub enum FontSource {
    /// Built-in Type1 Helvetica family, WinAnsi encoded.
    #[default]
    Helvetica,
    /// TrueType/OpenType bytes, embedded as a subsetted CIDFont.
    TrueType(Vec<u8>),
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Helvetica => f.write_str("Helvetica"),
            FontSource::TrueType(data) => write!(f, "TrueType({} bytes)", data.len()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FontConfig {
    pub regular: FontSource,
    pub bold: FontSource,
}

#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Vertical zone at the page bottom excluded from the fit check.
    pub footer_reserved_height: f32,
    pub fonts: FontConfig,
    /// Date printed on the cover. `None` uses the local date at render time.
    pub generated_on: Option<NaiveDate>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: DEFAULT_MARGIN,
            footer_reserved_height: DEFAULT_FOOTER_RESERVED,
            fonts: FontConfig::default(),
            generated_on: None,
        }
    }
}

impl LayoutConfig {
    pub fn geometry(&self) -> Result<PageGeometry, Error> {
        let values = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("margin", self.margin),
            ("footer reserved height", self.footer_reserved_height),
        ];
        for (name, v) in values {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidGeometry(format!(
                    "{name} must be a finite, non-negative number (got {v})"
                )));
            }
        }

        let geometry = PageGeometry {
            page_width: self.page_width,
            page_height: self.page_height,
            margin: self.margin,
            usable_width: self.page_width - 2.0 * self.margin,
            footer_reserved_height: self.footer_reserved_height,
        };
        if geometry.usable_width <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "usable width {} <= 0 (page width {}, margin {})",
                geometry.usable_width, self.page_width, self.margin
            )));
        }
        let content_height = geometry.effective_content_height() - self.margin;
        let min_height = crate::layout::min_content_height();
        if content_height < min_height {
            return Err(Error::InvalidGeometry(format!(
                "content area {content_height}pt is shorter than the tallest block ({min_height}pt): \
                 page height {}, footer zone {}, margin {}",
                self.page_height, self.footer_reserved_height, self.margin
            )));
        }
        Ok(geometry)
    }

    pub fn generation_date(&self) -> NaiveDate {
        self.generated_on
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Page constants derived from [`LayoutConfig`]. Fixed for a whole document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub usable_width: f32,
    pub footer_reserved_height: f32,
}

impl PageGeometry {
    /// Lowest top-down y any content may reach.
    pub fn effective_content_height(&self) -> f32 {
        self.page_height - self.footer_reserved_height
    }

    pub fn footer_baseline(&self) -> f32 {
        self.page_height - self.footer_reserved_height / 2.0
    }
}
