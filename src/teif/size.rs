use serde::{Deserialize, Serialize};

/// Byte ceiling applied by the submission platform.
pub const DEFAULT_MAX_BYTES: usize = 50_000;

/// Serialized TEIF text after size governance.
///
/// Immutable once returned; inspect [`final_size`](Self::final_size) to
/// decide whether the document can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledDocument {
    text: String,
    original_size: usize,
    final_size: usize,
    trimmed: bool,
}

impl CompiledDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Byte length before any content was removed.
    pub fn original_size(&self) -> usize {
        self.original_size
    }

    /// Byte length of [`text`](Self::text).
    pub fn final_size(&self) -> usize {
        self.final_size
    }

    /// `true` when the input exceeded the ceiling and removal passes ran,
    /// even if nothing removable was found.
    pub fn trimmed(&self) -> bool {
        self.trimmed
    }
}

/// Optional content eligible for removal, in removal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemovableBlock {
    /// Free-text note block.
    Ftx,
    /// Amount-in-words annotations under `Moa`.
    AmountDescription,
}

impl RemovableBlock {
    const ORDER: [Self; 2] = [Self::Ftx, Self::AmountDescription];

    fn element(&self) -> &'static str {
        match self {
            Self::Ftx => "Ftx",
            Self::AmountDescription => "AmountDescription",
        }
    }
}

/// Bring `text` under `ceiling` bytes by removing optional blocks.
///
/// Never fails. Text already within the ceiling is returned untouched.
/// Otherwise note blocks are removed first, then amount descriptions, with
/// a re-measure after each class; mandatory content is never touched, so
/// the result may still exceed the ceiling.
pub fn enforce_size(text: &str, ceiling: usize) -> CompiledDocument {
    let original_size = text.len();
    if original_size <= ceiling {
        return CompiledDocument {
            text: text.to_string(),
            original_size,
            final_size: original_size,
            trimmed: false,
        };
    }

    let mut current = text.to_string();
    // Removing one block can splice a new one together, so repeat the
    // classes until a round removes nothing.
    loop {
        let mut round_removed = 0;
        for block in RemovableBlock::ORDER {
            if current.len() <= ceiling {
                break;
            }
            let (stripped, removed) = strip_all(&current, block.element());
            if removed > 0 {
                tracing::debug!(
                    element = block.element(),
                    removed,
                    before = current.len(),
                    after = stripped.len(),
                    "removed optional TEIF content"
                );
            }
            round_removed += removed;
            current = stripped;
        }
        if round_removed == 0 || current.len() <= ceiling {
            break;
        }
    }

    let final_size = current.len();
    if final_size > ceiling {
        tracing::warn!(
            original_size,
            final_size,
            ceiling,
            "TEIF document still exceeds size ceiling after trimming"
        );
    }

    CompiledDocument {
        text: current,
        original_size,
        final_size,
        trimmed: true,
    }
}

/// [`enforce_size`] with [`DEFAULT_MAX_BYTES`].
pub fn enforce_default_size(text: &str) -> CompiledDocument {
    enforce_size(text, DEFAULT_MAX_BYTES)
}

/// Apply [`strip_elements`] until no `name` element is left.
fn strip_all(text: &str, name: &str) -> (String, usize) {
    let (mut current, mut total) = strip_elements(text, name);
    let mut removed = total;
    while removed > 0 {
        (current, removed) = strip_elements(&current, name);
        total += removed;
    }
    (current, total)
}

/// Remove every `name` element (with its content) from `text` in one pass.
///
/// Returns the new text and the number of elements removed. An element
/// starting its own line takes its indentation and line break with it.
fn strip_elements(text: &str, name: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut removed = 0;

    while let Some(start) = find_open_tag(rest, name) {
        let Some(end) = element_end(&rest[start..], name).map(|len| start + len) else {
            // Unterminated element: leave the remainder alone.
            break;
        };

        let mut cut = start;
        let before = &rest[..start];
        let line_start = before.rfind('\n');
        let indent = &before[line_start.map_or(0, |i| i + 1)..];
        if indent.bytes().all(|b| b == b' ' || b == b'\t') {
            cut = line_start.unwrap_or(start - indent.len());
        }

        out.push_str(&rest[..cut]);
        rest = &rest[end..];
        removed += 1;
    }

    out.push_str(rest);
    (out, removed)
}

/// Byte offset of the next `<name` start or empty tag, matching the full name.
fn find_open_tag(text: &str, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(&needle) {
        let at = offset + pos;
        let after = text[at + needle.len()..].bytes().next();
        if matches!(after, Some(b'>' | b'/' | b' ' | b'\t' | b'\r' | b'\n')) {
            return Some(at);
        }
        offset = at + needle.len();
    }
    None
}

/// Length of the element starting at the beginning of `text`, up to and
/// including its closing tag.
fn element_end(text: &str, name: &str) -> Option<usize> {
    let tag_end = text.find('>')? + 1;
    if text[..tag_end].ends_with("/>") {
        return Some(tag_end);
    }

    let close = format!("</{name}>");
    let mut depth = 1;
    let mut offset = tag_end;
    loop {
        let next_close = text[offset..].find(&close).map(|p| offset + p)?;
        let next_open = find_open_tag(&text[offset..], name).map(|p| offset + p);
        match next_open {
            Some(open) if open < next_close => {
                let inner_end = open + text[open..].find('>')? + 1;
                if !text[open..inner_end].ends_with("/>") {
                    depth += 1;
                }
                offset = inner_end;
            }
            _ => {
                depth -= 1;
                offset = next_close + close.len();
                if depth == 0 {
                    return Some(offset);
                }
            }
        }
    }
}
