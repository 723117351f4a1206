//! Layout of rewritten sections
//!
//! Entries are written as `key = value` with the `=` aligned on a common
//! column. Continuation lines of multi-line values are indented to start
//! right after the `= `.

use std::cmp::Ordering;

use indexmap::IndexMap;

/// Order of the keys in a rewritten section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Sorting {
    /// Keep the current order
    #[default]
    #[value(skip)]
    None,
    /// Case-insensitive alphabetical order
    Alpha,
    /// Raw byte order
    Ascii,
    /// Shortest key first, then alphabetical
    Length,
}

impl Sorting {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Sorting::None => Ordering::Equal,
            Sorting::Alpha => a.to_lowercase().cmp(&b.to_lowercase()),
            Sorting::Ascii => a.cmp(b),
            Sorting::Length => a
                .chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.to_lowercase().cmp(&b.to_lowercase())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Column of the `=`; computed from the longest key when `None`
    pub indentation: Option<usize>,
    pub sorting: Sorting,
}

/// Indentation aligning every key of a section: longest key plus one space
pub fn auto_indentation<'a>(keys: impl IntoIterator<Item = &'a str>) -> usize {
    keys.into_iter()
        .map(|key| key.chars().count())
        .max()
        .unwrap_or(0)
        + 1
}

/// Render a single `key = value` line (without the trailing newline)
pub fn render_entry(key: &str, value: &str, indentation: usize) -> String {
    if value.is_empty() {
        return format!("{key:<indentation$}=");
    }
    let continuation = format!("\n{}", " ".repeat(indentation + 2));
    format!(
        "{key:<indentation$}= {}",
        value.replace('\n', &continuation)
    )
}

/// Render a section header followed by its entries
pub fn render_section(
    name: &str,
    entries: &IndexMap<String, String>,
    options: &WriteOptions,
) -> String {
    let mut items: Vec<(&str, &str)> = entries
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    // Stable sort: equal keys keep their relative order.
    items.sort_by(|a, b| options.sorting.compare(a.0, b.0));

    let indentation = options
        .indentation
        .unwrap_or_else(|| auto_indentation(items.iter().map(|(key, _)| *key)));

    let mut block = format!("[{name}]\n");
    for (key, value) in items {
        block.push_str(&render_entry(key, value, indentation));
        block.push('\n');
    }
    block
}
