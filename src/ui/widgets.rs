//! Widget helpers shared by the draw functions in [draw].
//!
//! Popup placement, width-aware truncation and the scrolling view of an input field.

pub mod draw;

pub(crate) use draw::{draw_footer, draw_menu, draw_modal, draw_panel};

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A `width` x `height` rect centered in `bounds`, shrunk to fit.
pub fn centered_rect(bounds: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(bounds.width);
    let h = height.min(bounds.height);
    Rect::new(
        bounds.x + (bounds.width - w) / 2,
        bounds.y + (bounds.height - h) / 2,
        w,
        h,
    )
}

/// A popup whose top-left corner sits at `anchor`, pushed back inside `bounds` when it would
/// overflow.
pub fn anchored_rect(bounds: Rect, anchor: (u16, u16), width: u16, height: u16) -> Rect {
    let w = width.min(bounds.width);
    let h = height.min(bounds.height);
    let x = anchor.0.clamp(bounds.x, bounds.right().saturating_sub(w));
    let y = anchor.1.clamp(bounds.y, bounds.bottom().saturating_sub(h));
    Rect::new(x, y, w, h)
}

/// Cuts `text` to at most `width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Visible slice of an input field and the cursor column inside it.
/// Keeps the tail of the text (and so the cursor at the end) visible when it overflows.
pub fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = input_text.len();
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w > visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}
