use crate::app::EditBuffer;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const CURSOR_INDICATOR: char = '▌';
const ELLIPSIS: char = '…';

/// Cuts `text` to at most `max_width` terminal columns, ending in an
/// ellipsis when something was dropped.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Field contents with the cursor indicator inserted at the cursor.
pub fn with_cursor(buffer: &EditBuffer) -> String {
    let at = buffer.byte_index(buffer.cursor);
    let mut out = String::with_capacity(buffer.text.len() + CURSOR_INDICATOR.len_utf8());
    out.push_str(&buffer.text[..at]);
    out.push(CURSOR_INDICATOR);
    out.push_str(&buffer.text[at..]);
    out
}

/// Keeps the cursor visible in a field `max_width` columns wide by
/// dropping text from the left.
pub fn visible_field(buffer: &EditBuffer, max_width: usize) -> String {
    let full = with_cursor(buffer);
    if full.width() <= max_width {
        return full;
    }

    let chars: Vec<char> = full.chars().collect();
    let mut start = 0;
    let cursor = buffer.cursor.min(chars.len());
    while start < cursor
        && chars[start..=cursor]
            .iter()
            .map(|ch| ch.width().unwrap_or(0))
            .sum::<usize>()
            > max_width
    {
        start += 1;
    }
    truncate(&chars[start..].iter().collect::<String>(), max_width)
}
