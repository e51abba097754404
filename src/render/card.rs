/// Display cards: the text and image a product tile shows
use std::path::PathBuf;

use crate::config::NumberLocale;
use crate::state::data::Product;

/// Everything the grid needs to draw one product
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub code: String,
    /// Non-empty description lines, in order
    pub lines: Vec<String>,
    /// Formatted price, e.g. `$ 1.234,5`
    pub price: String,
    pub image: PathBuf,
    /// Short text describing the photo (first line, else the code)
    pub alt: String,
}

impl Card {
    pub fn new(product: &Product, image: PathBuf, locale: &NumberLocale) -> Self {
        let lines: Vec<String> = product.description().map(display_text).collect();
        let alt = if product.lines[0].is_empty() {
            display_text(&product.code)
        } else {
            display_text(&product.lines[0])
        };

        Self {
            code: display_text(&product.code),
            lines,
            price: format_price(&product.price, locale),
            image,
            alt,
        }
    }
}

/// Make untrusted table text safe to show.
///
/// Text widgets draw strings literally, so markup is never interpreted;
/// what is left to strip are control and bidi override characters that
/// could reorder or hide the surrounding text.
pub fn display_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() && !is_bidi_control(*c))
        .collect()
}

fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{200E}' | '\u{200F}')
}

/// Format a raw price for display.
///
/// Empty, non-numeric and non-finite values show as zero. Valid numbers are
/// rounded to at most two fractional digits and grouped by thousands.
pub fn format_price(raw: &str, locale: &NumberLocale) -> String {
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    };
    format!("{} {}", locale.currency_symbol, format_number(value, locale))
}

fn format_number(value: f64, locale: &NumberLocale) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }

    let digits = int_part.len();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(locale.grouping_separator);
        }
        out.push(digit);
    }

    if !frac_part.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }

    out
}
