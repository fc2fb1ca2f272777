use crate::config::PageGeometry;

use super::Page;

/// Where the controller is in the cover → sections → done sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    NotStarted,
    Cover,
    Section(usize),
    Done,
}

/// Owns the page list and the running top-down y. The only place pages are added.
pub(crate) struct Paginator {
    geometry: PageGeometry,
    finished: Vec<Page>,
    current: Page,
    y: f32,
    phase: Phase,
}

impl Paginator {
    pub(crate) fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Page::default(),
            y: geometry.margin,
            phase: Phase::NotStarted,
        }
    }

    /// Page 1, unconditionally, with no fit check.
    pub(crate) fn begin_cover(&mut self) {
        debug_assert_eq!(self.phase, Phase::NotStarted);
        self.phase = Phase::Cover;
        self.y = self.geometry.margin;
    }

    /// Every section opens a fresh page, however much room the previous one left.
    pub(crate) fn begin_section(&mut self, number: usize) {
        debug_assert!(matches!(self.phase, Phase::Cover | Phase::Section(_)));
        self.new_page();
        self.phase = Phase::Section(number);
        log::debug!("section {number} starts on page {}", self.page_number());
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = self.geometry.margin;
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// 1-based physical index of the page being drawn.
    pub(crate) fn page_number(&self) -> usize {
        self.finished.len() + 1
    }

    pub(crate) fn y(&self) -> f32 {
        self.y
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.geometry.effective_content_height() - self.y
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.geometry.margin
    }

    /// Break the page before a block of height `h` that would cross into the
    /// footer zone. A block taller than a whole page is drawn at the top of
    /// the page it lands on rather than breaking again. Returns true if a
    /// page was added.
    pub(crate) fn ensure_space(&mut self, h: f32) -> bool {
        if self.remaining() >= h || self.at_page_top() {
            return false;
        }
        log::debug!(
            "page break before {h:.1}pt block at y={:.1} ({:.1}pt left) in {:?}",
            self.y,
            self.remaining(),
            self.phase,
        );
        self.new_page();
        true
    }

    pub(crate) fn advance(&mut self, h: f32) {
        self.y += h;
    }

    pub(crate) fn page(&mut self) -> &mut Page {
        &mut self.current
    }

    pub(crate) fn finish(mut self) -> Vec<Page> {
        self.phase = Phase::Done;
        self.finished.push(self.current);
        self.finished
    }
}
