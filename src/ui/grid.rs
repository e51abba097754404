use iced::widget::image::Handle;
use iced::widget::{center, column, container, scrollable, text, tooltip, Image};
use iced::{Element, Length};
use iced_aw::Wrap;

use crate::render::{Card, Generation, RenderEvent};
use crate::Message;

/// Size of the photo inside a card (square)
const PHOTO_SIZE: f32 = 180.0;
const CARD_WIDTH: f32 = PHOTO_SIZE + 24.0;

/// Cards on display, fed by render events.
///
/// Only events of the pass started last are accepted; anything from an
/// older pass arriving late is dropped.
#[derive(Debug, Default)]
pub struct Grid {
    generation: Generation,
    cards: Vec<Card>,
    /// The current pass found nothing to show
    no_results: bool,
}

impl Grid {
    /// Accept events from `generation` only, from now on
    pub fn start(&mut self, generation: Generation) {
        self.generation = generation;
    }

    /// Apply a render event. Returns false when it was stale and ignored.
    pub fn apply(&mut self, event: RenderEvent) -> bool {
        if event.generation() != self.generation {
            log::trace!(
                "Dropping event of stale pass {} (current {})",
                event.generation(),
                self.generation
            );
            return false;
        }

        match event {
            RenderEvent::Cleared { .. } => {
                self.cards.clear();
                self.no_results = false;
            }
            RenderEvent::Empty { .. } => self.no_results = true,
            RenderEvent::Batch { index, cards, .. } => {
                log::trace!("Batch {} adds {} cards", index, cards.len());
                self.cards.extend(cards);
            }
            RenderEvent::Finished { batches, .. } => {
                log::trace!("Pass {} finished after {} batches", self.generation, batches);
            }
        }
        true
    }

    #[cfg(test)]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[cfg(test)]
    pub fn no_results(&self) -> bool {
        self.no_results
    }

    pub fn view(&self) -> Element<'_, Message> {
        if self.no_results {
            return center(text("No products found").size(18)).into();
        }

        let cards: Vec<Element<Message>> = self.cards.iter().map(card).collect();

        scrollable(
            Wrap::with_elements(cards)
                .spacing(12.0)
                .line_spacing(12.0)
                .padding(4.0),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

fn card(card: &Card) -> Element<'_, Message> {
    let photo = Image::new(Handle::from_path(&card.image))
        .width(Length::Fixed(PHOTO_SIZE))
        .height(Length::Fixed(PHOTO_SIZE));

    let mut content = column![
        tooltip(photo, text(&card.alt), tooltip::Position::Bottom),
        text(&card.code).size(18),
    ]
    .spacing(6);

    for line in &card.lines {
        content = content.push(text(line).size(13));
    }
    content = content.push(text(&card.price).size(16));

    container(content)
        .width(Length::Fixed(CARD_WIDTH))
        .padding(12)
        .style(container::rounded_box)
        .into()
}
