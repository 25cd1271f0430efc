//! Splits the help guide into message-sized sections.
//!
//! Sections are separated by lines containing only `---`. Anything longer
//! than an embed description is cut again at line boundaries, and a single
//! overlong line at char boundaries.

use crate::errors::Result;
use std::path::Path;

/// Line that separates guide sections.
pub const SECTION_SEPARATOR: &str = "---";

/// Discord's embed description limit, in characters.
pub const MAX_SECTION_CHARS: usize = 4096;

/// The guide text, ready to be walked section by section.
#[derive(Debug, Clone)]
pub struct HelpGuide {
    text: String,
    max_chars: usize,
}

impl HelpGuide {
    /// Wraps guide text using the embed description limit.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_limit(text, MAX_SECTION_CHARS)
    }

    /// Wraps guide text with a custom section limit.
    #[must_use]
    pub fn with_limit(text: impl Into<String>, max_chars: usize) -> Self {
        Self {
            text: text.into(),
            max_chars: max_chars.max(1),
        }
    }

    /// Reads the guide from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(Self::new(text))
    }

    /// Lazily yields the sections in order. Each call starts from the top.
    #[must_use]
    pub fn sections(&self) -> Sections<'_> {
        Sections {
            rest: &self.text,
            current: "",
            max_chars: self.max_chars,
        }
    }
}

/// Iterator over guide sections, see [`HelpGuide::sections`].
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    rest: &'a str,
    current: &'a str,
    max_chars: usize,
}

impl<'a> Iterator for Sections<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.current.is_empty() {
                let (chunk, remainder) = split_chunk(self.current, self.max_chars);
                self.current = remainder;
                let chunk = chunk.trim();
                if !chunk.is_empty() {
                    return Some(chunk);
                }
                continue;
            }
            if self.rest.is_empty() {
                return None;
            }
            let (section, remainder) = next_section(self.rest);
            self.current = section.trim();
            self.rest = remainder;
        }
    }
}

/// Splits off everything before the next separator line.
fn next_section(text: &str) -> (&str, &str) {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if line.trim() == SECTION_SEPARATOR {
            return (&text[..start], &text[start + line.len()..]);
        }
        start += line.len();
    }
    (text, "")
}

/// Takes at most `max_chars` chars, preferring to cut after a full line.
fn split_chunk(section: &str, max_chars: usize) -> (&str, &str) {
    let Some((limit, _)) = section.char_indices().nth(max_chars) else {
        return (section, "");
    };
    match section[..limit].rfind('\n') {
        Some(newline) if newline > 0 => (&section[..newline], &section[newline + 1..]),
        _ => (&section[..limit], &section[limit..]),
    }
}
