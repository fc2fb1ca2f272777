use std::collections::{BTreeSet, HashMap};

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::{FontConfig, FontSource};
use crate::error::{Error, RenderError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width at 1000 units/em for a WinAnsi byte.
    fn width_1000(self, byte: u8) -> f32 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_ASCII,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_ASCII,
        };
        let bold = self == StandardFont::HelveticaBold;
        match byte {
            32..=126 => table[(byte - 32) as usize],
            0x82 | 0x91 | 0x92 => {
                if bold {
                    278.0
                } else {
                    222.0
                }
            }
            0x84 | 0x93 | 0x94 => {
                if bold {
                    500.0
                } else {
                    333.0
                }
            }
            0x85 | 0x89 | 0x97 | 0x99 => 1000.0,
            0x8B | 0x9B => 333.0,
            0x95 => 350.0, // bullet
            0xA0 => 278.0,
            _ => 556.0,
        }
    }
}

#[rustfmt::skip]
const HELVETICA_ASCII: [f32; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, 333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    278.0, 278.0, 584.0, 584.0, 584.0, 556.0, 1015.0,
    667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 500.0, 667.0, 556.0, 833.0,
    722.0, 778.0, 667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0,
    278.0, 278.0, 278.0, 469.0, 556.0, 333.0,
    556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, 556.0, 222.0, 222.0, 500.0, 222.0, 833.0,
    556.0, 556.0, 556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, 500.0, 500.0, 500.0,
    334.0, 260.0, 334.0, 584.0,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [f32; 95] = [
    278.0, 333.0, 474.0, 556.0, 556.0, 889.0, 722.0, 238.0, 333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    333.0, 333.0, 584.0, 584.0, 584.0, 611.0, 975.0,
    722.0, 722.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 556.0, 722.0, 611.0, 833.0,
    722.0, 778.0, 667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0,
    333.0, 278.0, 333.0, 584.0, 556.0, 333.0,
    556.0, 611.0, 556.0, 611.0, 556.0, 333.0, 611.0, 611.0, 278.0, 278.0, 556.0, 278.0, 889.0,
    611.0, 611.0, 611.0, 611.0, 389.0, 556.0, 333.0, 611.0, 556.0, 778.0, 556.0, 556.0, 500.0,
    389.0, 280.0, 389.0, 584.0,
];

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte.
fn char_to_winansi(c: char) -> Option<u8> {
    let byte = match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8, // Latin-1 supplement maps directly
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// A font as seen by layout: enough to measure text, and the source needed to embed it.
pub(crate) enum FontFace<'a> {
    Standard(StandardFont),
    TrueType {
        data: &'a [u8],
        face: Face<'a>,
        ps_name: String,
    },
}

fn font_family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .find_map(|name| name.to_string())
}

impl<'a> FontFace<'a> {
    fn from_source(source: &'a FontSource, weight: Weight) -> Result<Self, RenderError> {
        match source {
            FontSource::Helvetica => Ok(FontFace::Standard(match weight {
                Weight::Regular => StandardFont::Helvetica,
                Weight::Bold => StandardFont::HelveticaBold,
            })),
            FontSource::TrueType(data) => {
                let face =
                    Face::parse(data, 0).map_err(|e| RenderError::FontParse(e.to_string()))?;
                let family = font_family_name(&face).unwrap_or_else(|| "EmbeddedFont".into());
                let mut ps_name: String = family.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
                if ps_name.is_empty() {
                    ps_name = "EmbeddedFont".into();
                }
                if weight == Weight::Bold {
                    ps_name.push_str("-Bold");
                }
                Ok(FontFace::TrueType {
                    data: data.as_slice(),
                    face,
                    ps_name,
                })
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            FontFace::Standard(f) => f.base_font(),
            FontFace::TrueType { ps_name, .. } => ps_name,
        }
    }

    /// Width of a single character in 1000-units. Control characters are zero-width.
    pub(crate) fn char_width_1000(&self, ch: char) -> Result<f32, RenderError> {
        if ch.is_control() {
            return Ok(0.0);
        }
        match self {
            FontFace::Standard(f) => char_to_winansi(ch)
                .map(|b| f.width_1000(b))
                .ok_or_else(|| self.unsupported(ch)),
            FontFace::TrueType { face, .. } => {
                let units = face.units_per_em() as f32;
                face.glyph_index(ch)
                    .map(|gid| face.glyph_hor_advance(gid).unwrap_or(0) as f32 / units * 1000.0)
                    .ok_or_else(|| self.unsupported(ch))
            }
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> Result<f32, RenderError> {
        let mut w = 0.0f32;
        for ch in text.chars() {
            w += self.char_width_1000(ch)? * font_size / 1000.0;
        }
        Ok(w)
    }

    fn unsupported(&self, ch: char) -> RenderError {
        RenderError::UnsupportedChar {
            ch,
            font: self.name().to_string(),
        }
    }
}

/// The regular/bold pair every draw call picks from.
pub(crate) struct Fonts<'a> {
    regular: FontFace<'a>,
    bold: FontFace<'a>,
}

impl<'a> Fonts<'a> {
    pub(crate) fn load(config: &'a FontConfig) -> Result<Self, Error> {
        Ok(Self {
            regular: FontFace::from_source(&config.regular, Weight::Regular)?,
            bold: FontFace::from_source(&config.bold, Weight::Bold)?,
        })
    }

    pub(crate) fn face(&self, weight: Weight) -> &FontFace<'a> {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    pub(crate) fn measure(&self, text: &str, weight: Weight, font_size: f32) -> Result<f32, RenderError> {
        self.face(weight).text_width(text, font_size)
    }
}

/// A font written into the PDF, with what is needed to encode strings for it.
pub(crate) struct RegisteredFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    font_name: String,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl RegisteredFont {
    /// WinAnsi bytes for standard fonts, big-endian glyph IDs for embedded CIDFonts.
    pub(crate) fn encode(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars().filter(|c| !c.is_control()) {
            match &self.char_to_gid {
                Some(map) => {
                    let gid = map.get(&ch).copied().ok_or_else(|| RenderError::UnsupportedChar {
                        ch,
                        font: self.font_name.clone(),
                    })?;
                    out.extend_from_slice(&gid.to_be_bytes());
                }
                None => out.push(char_to_winansi(ch).ok_or_else(|| {
                    RenderError::UnsupportedChar {
                        ch,
                        font: self.font_name.clone(),
                    }
                })?),
            }
        }
        Ok(out)
    }
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    face: &FontFace,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &BTreeSet<char>,
) -> Result<RegisteredFont, Error> {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match face {
        FontFace::Standard(f) => {
            pdf.type1_font(font_ref)
                .base_font(Name(f.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            None
        }
        FontFace::TrueType { data, face, ps_name } => Some(embed_truetype(
            pdf, font_ref, ps_name, data, face, used_chars, alloc,
        )?),
    };

    log::debug!(
        "register_font: {} as /{pdf_name} ({} chars) → {:.1}ms",
        face.name(),
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(RegisteredFont {
        pdf_name,
        font_ref,
        font_name: face.name().to_string(),
        char_to_gid,
    })
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face: &Face,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>, Error> {
    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| to_1000(h as f32))
        .unwrap_or(700.0);
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    // BTreeSet iteration keeps glyph numbering stable between runs
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, 0, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {ps_name}: {e}; embedding full font");
        font_data.to_vec()
    });
    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| RenderError::FontParse(format!("{ps_name}: font program too large")))?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for &ch in used_chars {
        if let Some(&new_gid) = char_to_gid.get(&ch) {
            cmap.pair(new_gid, ch);
        }
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}
