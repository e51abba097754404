use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use super::data::Product;
use crate::error::{CatalogError, Result};

/// Field separator of the product table
const SEPARATOR: char = ';';

/// Rows with fewer fields than this are dropped
const MIN_FIELDS: usize = 3;

const CODE_COLUMN: &str = "CODIGO";
const CATEGORY_COLUMN: &str = "RUBRO";
const LINE_COLUMNS: [&str; 4] = ["LINEA1", "LINEA2", "LINEA3", "LINEA4"];
const PRICE_COLUMN: &str = "PRECIO";

/// The Catalog holds every product parsed from the product table
/// and the category set derived from them.
///
/// It is built once at startup and never mutated afterwards; views share
/// products through `Arc` instead of copying them.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    categories: Vec<String>,
    /// First category in table order, shown at startup
    first_category: Option<String>,
}

/// Column positions resolved from the header line
struct Columns {
    code: Option<usize>,
    category: Option<usize>,
    lines: [Option<usize>; 4],
    price: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Self {
        let names: Vec<&str> = header.split(SEPARATOR).map(str::trim).collect();
        let find = |name: &str| names.iter().position(|h| *h == name);

        Self {
            code: find(CODE_COLUMN),
            category: find(CATEGORY_COLUMN),
            lines: LINE_COLUMNS.map(find),
            price: find(PRICE_COLUMN),
        }
    }

    fn product(&self, fields: &[&str]) -> Product {
        let get = |column: Option<usize>| {
            column
                .and_then(|i| fields.get(i))
                .map(|value| value.to_string())
                .unwrap_or_default()
        };

        Product {
            code: get(self.code),
            category: get(self.category),
            lines: self.lines.map(get),
            price: get(self.price),
        }
    }
}

impl Catalog {
    /// Parse a semicolon-delimited product table.
    ///
    /// The first line holds the column names. Every other line is one
    /// product; fields are trimmed and lines with fewer than three fields
    /// are skipped without error. A leading byte order mark is ignored.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.trim_start_matches('\u{FEFF}').trim().lines();
        let Some(header) = lines.next() else {
            return Self::default();
        };
        let columns = Columns::from_header(header);

        let mut products = Vec::new();
        let mut categories = BTreeSet::new();
        let mut first_category = None;
        let mut skipped = 0usize;

        for line in lines {
            let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
            if fields.len() < MIN_FIELDS {
                skipped += 1;
                continue;
            }

            let product = columns.product(&fields);
            if !product.category.is_empty() {
                if first_category.is_none() {
                    first_category = Some(product.category.clone());
                }
                categories.insert(product.category.clone());
            }
            products.push(Arc::new(product));
        }

        if skipped > 0 {
            log::debug!("Skipped {} malformed rows", skipped);
        }

        products.sort_by(|a, b| {
            a.code
                .to_lowercase()
                .cmp(&b.code.to_lowercase())
                .then_with(|| a.code.cmp(&b.code))
        });

        Self {
            products,
            categories: categories.into_iter().collect(),
            first_category,
        }
    }

    /// Read and parse the product table at `path`.
    ///
    /// Bytes that are not valid UTF-8 (e.g. a Latin-1 export) are replaced
    /// instead of failing the whole catalog.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CatalogError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let text = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = text {
            log::warn!("⚠️  {} is not valid UTF-8, some characters were replaced", path.display());
        }

        let catalog = Self::parse(&text);
        log::info!(
            "📦 Loaded {} products in {} categories from {}",
            catalog.len(),
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct non-empty categories, alphabetically ordered
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Category of the first categorized row, in table order
    pub fn first_category(&self) -> Option<&str> {
        self.first_category.as_deref()
    }

    /// All products of one category, in catalog order
    pub fn by_category(&self, category: &str) -> Vec<Arc<Product>> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over code, first two lines and category
    pub fn search(&self, query: &str) -> Vec<Arc<Product>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| p.matches(&needle))
            .cloned()
            .collect()
    }
}
