/// User interface building blocks
///
/// - header.rs: title, search box and menu toggle
/// - sidebar.rs: category list
/// - grid.rs: product cards of the current render pass
/// - theme.rs: per-category accent colours
use iced::widget::{center, column, text};
use iced::{Color, Element};

use crate::Message;

pub mod grid;
pub mod header;
pub mod sidebar;
pub mod theme;

/// Shown while the product table is being read
pub fn loading<'a>() -> Element<'a, Message> {
    center(text("⏳ Loading catalog...").size(20)).into()
}

/// Replaces the whole catalog when the product table could not be read
pub fn load_error(error: &str) -> Element<'_, Message> {
    center(
        column![
            text("⚠️ Error loading the catalog. Please restart the application.").size(20),
            text(error).size(14).color(Color::from_rgb(0.6, 0.6, 0.6)),
        ]
        .spacing(10),
    )
    .into()
}
