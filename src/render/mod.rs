/// Product grid rendering
///
/// This module handles:
/// - Turning products into display cards (card.rs)
/// - Delivering cards to the display in batches, one pass at a time (batch.rs)

pub mod batch;
pub mod card;

pub use batch::{BatchRenderer, Generation, RenderEvent, RenderOutcome};
pub use card::Card;
