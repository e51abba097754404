/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog store, the renderer and the UI layer.

/// Represents a single product row of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    /// Unique product code (e.g., "A1"), also the photo file stem
    pub code: String,
    /// Category ("rubro"); empty when the row has none
    pub category: String,
    /// Up to four free-text description lines, empty when missing
    pub lines: [String; 4],
    /// Raw price as written in the table; may be empty or non-numeric
    pub price: String,
}

impl Product {
    /// Description lines that actually carry text
    pub fn description(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str).filter(|line| !line.is_empty())
    }

    /// Case-insensitive match against code, the first two lines or category.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.code, &self.lines[0], &self.lines[1], &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
