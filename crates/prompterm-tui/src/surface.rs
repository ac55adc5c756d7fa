//! Prompter viewport as a scroll surface
//!
//! The engine works in pixels; the terminal works in rows. One row is
//! `line_height_px` pixels. The script is padded by half a viewport above
//! and below, so position 0 shows the first line at the reading line in
//! the middle and the maximum offset shows the last line there.

use std::cell::RefCell;
use std::rc::Rc;

use prompterm_core::playback::{ScrollExtent, Surface};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportMetrics {
    pub offset_px: f64,
    pub line_height_px: f64,
    /// Wrapped script rows, without padding
    pub content_rows: usize,
    pub viewport_rows: u16,
    pub animating: bool,
}

impl ViewportMetrics {
    /// Blank rows above the script
    pub fn top_padding(&self) -> usize {
        usize::from(self.viewport_rows / 2)
    }

    /// First virtual row (padding included) shown at the top of the viewport
    pub fn top_row(&self) -> usize {
        if self.line_height_px <= 0.0 {
            return 0;
        }
        (self.offset_px / self.line_height_px).floor().max(0.0) as usize
    }
}

/// Shared handle: the engine writes the offset, the renderer reads it
#[derive(Debug, Clone)]
pub struct ViewportSurface {
    metrics: Rc<RefCell<ViewportMetrics>>,
}

impl ViewportSurface {
    pub fn new(line_height_px: f64) -> Self {
        Self {
            metrics: Rc::new(RefCell::new(ViewportMetrics {
                offset_px: 0.0,
                line_height_px,
                content_rows: 0,
                viewport_rows: 0,
                animating: false,
            })),
        }
    }

    /// Record the laid-out size of the script and the viewport
    pub fn set_layout(&self, content_rows: usize, viewport_rows: u16) {
        let mut metrics = self.metrics.borrow_mut();
        metrics.content_rows = content_rows;
        metrics.viewport_rows = viewport_rows;
    }

    /// Change the row height; the offset is left for the engine to re-apply
    pub fn set_line_height(&self, line_height_px: f64) {
        self.metrics.borrow_mut().line_height_px = line_height_px;
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics.borrow().clone()
    }

    pub fn offset_px(&self) -> f64 {
        self.metrics.borrow().offset_px
    }
}

impl Surface for ViewportSurface {
    fn apply_offset(&mut self, offset: f64) {
        self.metrics.borrow_mut().offset_px = offset;
    }

    fn extent(&self) -> ScrollExtent {
        let metrics = self.metrics.borrow();
        let line_height = metrics.line_height_px;
        let viewport = f64::from(metrics.viewport_rows) * line_height;
        // Half a viewport of padding on each side
        let content = metrics.content_rows as f64 * line_height + viewport;
        ScrollExtent::new(content, viewport)
    }

    fn set_animating(&mut self, animating: bool) {
        self.metrics.borrow_mut().animating = animating;
    }
}

/// Word-wrap text to `width` display columns
///
/// Words longer than the width are broken across rows. Empty lines are kept.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            rows.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0usize;

        for word in line.split_whitespace() {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(word);
                current_width += word_width;
                continue;
            }

            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                for c in word.chars() {
                    let w = c.width().unwrap_or(0);
                    if current_width + w > width && !current.is_empty() {
                        rows.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += w;
                }
            }
        }

        if !current.is_empty() {
            rows.push(current);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_includes_half_viewport_padding() {
        let mut surface = ViewportSurface::new(10.0);
        surface.set_layout(50, 20);

        let extent = surface.extent();
        assert_eq!(extent.viewport_height, 200.0);
        assert_eq!(extent.content_height, 700.0);
        // Last script row lands on the reading line
        assert_eq!(extent.max_offset(), 500.0);

        surface.apply_offset(123.0);
        assert_eq!(surface.offset_px(), 123.0);
        assert_eq!(surface.metrics().top_row(), 12);
        assert_eq!(surface.metrics().top_padding(), 10);
    }

    #[test]
    fn test_handles_share_state() {
        let surface = ViewportSurface::new(36.0);
        let mut engine_side = surface.clone();
        engine_side.apply_offset(72.0);
        engine_side.set_animating(true);

        let metrics = surface.metrics();
        assert_eq!(metrics.top_row(), 2);
        assert!(metrics.animating);
    }

    #[test]
    fn test_line_height_rescales_extent() {
        let surface = ViewportSurface::new(10.0);
        surface.set_layout(50, 20);
        surface.set_line_height(20.0);

        let extent = surface.extent();
        assert_eq!(extent.viewport_height, 400.0);
        assert_eq!(extent.content_height, 1400.0);
        assert_eq!(surface.metrics().line_height_px, 20.0);
    }

    #[test]
    fn test_wrap_words() {
        let rows = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(rows, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        let rows = wrap_text("one\n\ntwo", 20);
        assert_eq!(rows, vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let rows = wrap_text("abcdefghij", 4);
        assert_eq!(rows, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_wide_chars() {
        let rows = wrap_text("日本語テキスト", 6);
        assert_eq!(rows, vec!["日本語", "テキス", "ト"]);
    }
}
