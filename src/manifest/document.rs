//! INI document model for versions files
//!
//! Follows the "raw" ConfigParser dialect used by buildout: case-preserving
//! keys, `=` or `:` separators, `#`/`;` comments in the first column and
//! indented continuation lines for multi-line values.
//!
//! Each section keeps its source lines so that sections which are not
//! rewritten come back out exactly as they were read.

use indexmap::IndexMap;
use thiserror::Error;

use crate::manifest::writer::{WriteOptions, render_section};

/// Syntax error found while parsing a document
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}: {content:?}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: IndexMap<String, String>,
    /// Source lines, `None` once the entries have been replaced
    raw: Option<Vec<String>>,
}

impl Section {
    fn parsed(name: &str, header: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: IndexMap::new(),
            raw: Some(vec![header.to_string()]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the section is emitted from its source lines
    pub fn is_raw(&self) -> bool {
        self.raw.is_some()
    }

    fn push_raw(&mut self, line: &str) {
        if let Some(raw) = self.raw.as_mut() {
            raw.push(line.to_string());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    preamble: Vec<String>,
    sections: IndexMap<String, Section>,
}

impl Document {
    pub fn parse(content: &str) -> Result<Self, SyntaxError> {
        let mut document = Document::default();
        let mut current: Option<String> = None;
        let mut open_option: Option<String> = None;

        for (index, line) in content.lines().enumerate() {
            let syntax_error = |message: &str| SyntaxError {
                line: index + 1,
                message: message.to_string(),
                content: line.to_string(),
            };

            let Some(section_name) = current.clone() else {
                if is_comment_or_blank(line) {
                    document.preamble.push(line.to_string());
                    continue;
                }
                match parse_header(line) {
                    Some(name) => {
                        document.open_section(name, line);
                        current = Some(name.to_string());
                        continue;
                    }
                    None => return Err(syntax_error("option found before any section header")),
                }
            };

            if is_comment_or_blank(line) {
                document.section_mut(&section_name).push_raw(line);
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let Some(option) = open_option.as_ref() {
                    let section = document.section_mut(&section_name);
                    section.push_raw(line);
                    if let Some(value) = section.entries.get_mut(option) {
                        value.push('\n');
                        value.push_str(line.trim());
                    }
                    continue;
                }
            }

            if let Some(name) = parse_header(line) {
                document.open_section(name, line);
                current = Some(name.to_string());
                open_option = None;
                continue;
            }

            let Some(separator) = line.find(['=', ':']) else {
                return Err(syntax_error("expected `key = value`"));
            };
            let key = line[..separator].trim();
            if key.is_empty() {
                return Err(syntax_error("empty option name"));
            }
            let value = line[separator + 1..].trim();

            let section = document.section_mut(&section_name);
            section.push_raw(line);
            section.entries.insert(key.to_string(), value.to_string());
            open_option = Some(key.to_string());
        }

        Ok(document)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Replace the entries of a section, appending the section if missing
    ///
    /// The section is rendered from its entries from now on.
    pub fn set_entries(&mut self, name: &str, entries: IndexMap<String, String>) {
        let section = self
            .sections
            .entry(name.to_string())
            .or_insert_with(|| Section {
                name: name.to_string(),
                ..Section::default()
            });
        section.entries = entries;
        section.raw = None;
    }

    /// Render the whole document
    ///
    /// Untouched sections are emitted from their source lines, rewritten ones
    /// with the given layout. Blocks are separated by a single blank line.
    pub fn render(&self, options: &WriteOptions) -> String {
        let mut blocks = Vec::new();

        if let Some(preamble) = raw_block(&self.preamble) {
            blocks.push(preamble);
        }

        for section in self.sections.values() {
            let block = match section.raw.as_deref().and_then(raw_block) {
                Some(block) => block,
                None => render_section(&section.name, &section.entries, options),
            };
            blocks.push(block);
        }

        blocks.join("\n")
    }

    fn open_section(&mut self, name: &str, header: &str) {
        match self.sections.get_mut(name) {
            Some(section) => section.push_raw(header),
            None => {
                self.sections
                    .insert(name.to_string(), Section::parsed(name, header));
            }
        }
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::parsed(name, &format!("[{name}]")))
    }
}

fn is_comment_or_blank(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('#') || line.starts_with(';')
}

fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let name = &rest[..end];
    if name.is_empty() { None } else { Some(name) }
}

fn raw_block(lines: &[String]) -> Option<String> {
    let end = lines.iter().rposition(|line| !line.trim().is_empty())?;
    let mut block = lines[..=end].join("\n");
    block.push('\n');
    Some(block)
}
