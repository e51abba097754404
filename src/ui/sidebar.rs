use iced::widget::{button, column, scrollable, text, Column};
use iced::{Element, Length};

use crate::Message;

/// One button per category, alphabetical, the active one highlighted
pub fn view<'a>(categories: &'a [String], active: Option<&str>, width: Length) -> Element<'a, Message> {
    let buttons = categories.iter().map(|category| {
        let style = if active == Some(category.as_str()) {
            button::primary
        } else {
            button::secondary
        };

        button(text(category))
            .on_press(Message::SelectCategory(category.clone()))
            .style(style)
            .width(Length::Fill)
            .padding(8)
            .into()
    });

    let list: Column<Message> = Column::with_children(buttons).spacing(4);

    scrollable(column![text("Categories").size(18), list].spacing(10).padding(4))
        .width(width)
        .height(Length::Fill)
        .into()
}
