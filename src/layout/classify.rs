/// Structural kind of one raw content line, with markers stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    Heading2(&'a str),
    Heading3(&'a str),
    Bullet(&'a str),
    Blank,
    Paragraph(&'a str),
}

/// Gap above, the drawn line slot, and gap below a fixed-height block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BlockSpacing {
    pub(crate) before: f32,
    pub(crate) line: f32,
    pub(crate) after: f32,
}

impl BlockSpacing {
    pub(crate) fn total(&self) -> f32 {
        self.before + self.line + self.after
    }
}

pub(crate) const BODY_LINE: f32 = 16.0;
pub(crate) const BLANK_GAP: f32 = 8.0;

pub(crate) const HEADING2: BlockSpacing = BlockSpacing {
    before: 8.0,
    line: 22.0,
    after: 14.0,
};
pub(crate) const HEADING3: BlockSpacing = BlockSpacing {
    before: 6.0,
    line: 18.0,
    after: 8.0,
};
pub(crate) const BULLET: BlockSpacing = BlockSpacing {
    before: 0.0,
    line: BODY_LINE,
    after: 0.0,
};

/// First match wins: `## `, `### `, `-`/`*` bullet, blank, paragraph.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return LineKind::Heading2(rest.trim());
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return LineKind::Heading3(rest.trim());
    }
    if let Some(rest) = trimmed.strip_prefix(['-', '*'])
        && rest.starts_with(char::is_whitespace)
    {
        return LineKind::Bullet(rest.trim());
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    LineKind::Paragraph(line.trim())
}

impl LineKind<'_> {
    /// Height checked against the page before the block is drawn. Blank
    /// lines are never checked; a paragraph checks each wrapped line itself.
    pub fn reserved_height(&self) -> Option<f32> {
        match self {
            LineKind::Heading2(_) => Some(HEADING2.total()),
            LineKind::Heading3(_) => Some(HEADING3.total()),
            LineKind::Bullet(_) => Some(BULLET.total()),
            LineKind::Blank | LineKind::Paragraph(_) => None,
        }
    }
}
