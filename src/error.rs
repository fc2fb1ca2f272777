use thiserror::Error;

/// A failure inside the drawing layer: measuring or encoding text, or
/// preparing a font for embedding.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("character {ch:?} cannot be rendered with {font}")]
    UnsupportedChar { ch: char, font: String },

    #[error("font could not be parsed: {0}")]
    FontParse(String),

    #[error("cover needs {needed:.1}pt but the page holds {available:.1}pt")]
    CoverOverflow { needed: f32, available: f32 },

    #[error("no font registered for {0:?} text")]
    MissingFont(crate::fonts::Weight),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Fatal to the whole document; no partial output is produced.
    #[error("conversion failed: {0}")]
    Render(#[from] RenderError),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
