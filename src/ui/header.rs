use iced::widget::{button, container, row, text, text_input};
use iced::{Alignment, Background, Color, Element, Length, Theme};

use crate::Message;

pub fn search_input_id() -> text_input::Id {
    text_input::Id::new("product-search")
}

/// Title bar with the search box, tinted with the active category's accent.
///
/// The clear button only shows while there is text to clear; the menu
/// button only on narrow windows, where the sidebar is collapsed.
pub fn view(query: &str, narrow: bool, accent: Color) -> Element<'_, Message> {
    let mut bar = row![].spacing(12).align_y(Alignment::Center);

    if narrow {
        bar = bar.push(
            button(text("☰"))
                .on_press(Message::ToggleMenu)
                .style(button::secondary)
                .padding(8),
        );
    }

    bar = bar.push(text("Product Catalog").size(24)).push(
        text_input("Search by code, description or category...", query)
            .id(search_input_id())
            .on_input(Message::SearchChanged)
            .padding(8)
            .width(Length::Fill),
    );

    if !query.is_empty() {
        bar = bar.push(
            button(text("✕"))
                .on_press(Message::ClearSearch)
                .style(button::text)
                .padding(8),
        );
    }

    container(bar)
        .width(Length::Fill)
        .padding(12)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(accent)),
            ..container::Style::default()
        })
        .into()
}
