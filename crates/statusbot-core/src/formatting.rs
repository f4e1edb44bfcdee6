//! Formatting helpers for Telegram HTML messages.

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Split a message into chunks of at most `limit` bytes.
///
/// Reports are line-oriented and never open a tag on one line and close it on
/// another, so cutting on newlines keeps every chunk's HTML balanced. A single
/// line longer than `limit` is cut on a char boundary as a last resort.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut chunk = String::new();

    for line in text.split('\n') {
        let needed = if chunk.is_empty() {
            line.len()
        } else {
            chunk.len() + 1 + line.len()
        };
        if needed <= limit {
            if !chunk.is_empty() {
                chunk.push('\n');
            }
            chunk.push_str(line);
            continue;
        }

        flush(&mut out, &mut chunk);

        let mut rest = line;
        while rest.len() > limit {
            let (head, tail) = split_utf8_prefix(rest, limit);
            out.push(head.to_string());
            rest = tail;
        }
        chunk.push_str(rest);
    }

    flush(&mut out, &mut chunk);
    out
}

fn flush(out: &mut Vec<String>, chunk: &mut String) {
    if chunk.trim().is_empty() {
        chunk.clear();
        return;
    }
    out.push(std::mem::take(chunk));
}

fn split_utf8_prefix(s: &str, max_bytes: usize) -> (&str, &str) {
    let mut idx = max_bytes.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    if idx == 0 {
        // Limit is smaller than the first char; emit that char on its own.
        idx = s.chars().next().map(char::len_utf8).unwrap_or(s.len());
    }
    s.split_at(idx)
}
