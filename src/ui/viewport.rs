//! Scroll state of one pane.
//!
//! Offsets and heights are in terminal rows. The synchronizer reads a pane's
//! offset and its total line count as the pane's scroll position and
//! scrollable height.

use std::ops::Range;

/// The visible window onto a pane's lines.
///
/// ```
/// use mdsync::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(20, 100);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.scroll_by(10);
/// assert_eq!(vp.visible_range(), 10..30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(height: u16, total_lines: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Scroll position as a percentage (0-100) of the scrollable range.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    /// Scroll by `delta` lines (negative is up). Returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let before = self.offset;
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = target.min(self.max_offset());
        self.offset != before
    }

    /// Scroll by a whole page in the direction of `pages`.
    pub fn scroll_pages(&mut self, pages: isize) -> bool {
        let page = isize::try_from(self.height.max(1)).unwrap_or(1);
        self.scroll_by(pages.saturating_mul(page))
    }

    /// Put `offset` at the top, clamped to the scrollable range.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    /// Scroll the least amount that brings `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) -> bool {
        let before = self.offset;
        if line < self.offset {
            self.offset = line;
        } else if self.height > 0 && line >= self.offset + self.height as usize {
            self.offset = line + 1 - self.height as usize;
        }
        self.offset = self.offset.min(self.max_offset());
        self.offset != before
    }

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    pub const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
