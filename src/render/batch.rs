use futures::channel::mpsc::UnboundedSender;
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::card::Card;
use crate::config::{Config, NumberLocale};
use crate::photo::ImageResolver;
use crate::state::data::Product;

/// Identifies one render pass; only the latest one may reach the display
pub type Generation = u64;

/// Display updates produced by a render pass
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// Drop every card shown so far and hide the "no results" indicator
    Cleared { generation: Generation },
    /// The pass had nothing to show
    Empty { generation: Generation },
    /// Cards of one batch, in input order
    Batch {
        generation: Generation,
        index: usize,
        cards: Vec<Card>,
    },
    /// Every batch was delivered
    Finished { generation: Generation, batches: usize },
}

impl RenderEvent {
    pub fn generation(&self) -> Generation {
        match self {
            RenderEvent::Cleared { generation }
            | RenderEvent::Empty { generation }
            | RenderEvent::Batch { generation, .. }
            | RenderEvent::Finished { generation, .. } => *generation,
        }
    }
}

/// Where render events go. The UI side decides how to draw them.
pub trait Surface {
    fn emit(&mut self, event: RenderEvent);
}

impl Surface for Vec<RenderEvent> {
    fn emit(&mut self, event: RenderEvent) {
        self.push(event);
    }
}

impl Surface for UnboundedSender<RenderEvent> {
    fn emit(&mut self, event: RenderEvent) {
        // The receiver is gone once the UI stopped listening to this pass
        let _ = self.unbounded_send(event);
    }
}

/// How a render pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed { batches: usize },
    Empty,
    /// A newer pass started; remaining output was discarded
    Superseded,
}

/// Shared, monotonically increasing render generation
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter(Arc<AtomicU64>);

impl GenerationCounter {
    /// Start a new generation, superseding all earlier ones
    pub fn advance(&self) -> Generation {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> Generation {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

/// Renders product lists in fixed-size batches.
///
/// Within a batch all photos are resolved concurrently; batches themselves
/// run strictly one after another, yielding to the executor in between so a
/// long list never monopolizes the UI.
#[derive(Debug, Clone)]
pub struct BatchRenderer {
    resolver: Arc<ImageResolver>,
    batch_size: usize,
    locale: NumberLocale,
    generations: GenerationCounter,
}

impl BatchRenderer {
    pub fn new(resolver: Arc<ImageResolver>, config: &Config) -> Self {
        Self {
            resolver,
            batch_size: config.effective_batch_size(),
            locale: config.locale.clone(),
            generations: GenerationCounter::default(),
        }
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    #[cfg(test)]
    pub fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    /// Start a new pass; any pass still running becomes stale
    pub fn begin(&self) -> Generation {
        self.generations.advance()
    }

    /// Render `products` to `surface` under `generation`
    pub async fn render<S: Surface>(
        &self,
        generation: Generation,
        products: &[Arc<Product>],
        surface: &mut S,
    ) -> RenderOutcome {
        if !self.generations.is_current(generation) {
            return RenderOutcome::Superseded;
        }

        surface.emit(RenderEvent::Cleared { generation });

        if products.is_empty() {
            surface.emit(RenderEvent::Empty { generation });
            return RenderOutcome::Empty;
        }

        let batches = products.len().div_ceil(self.batch_size);
        for (index, batch) in products.chunks(self.batch_size).enumerate() {
            let cards = join_all(batch.iter().map(|product| self.materialize(product))).await;

            if !self.generations.is_current(generation) {
                log::debug!("Render pass {} superseded at batch {}", generation, index);
                return RenderOutcome::Superseded;
            }

            surface.emit(RenderEvent::Batch {
                generation,
                index,
                cards,
            });

            if index + 1 < batches {
                tokio::task::yield_now().await;
            }
        }

        surface.emit(RenderEvent::Finished { generation, batches });
        log::debug!(
            "Render pass {} done: {} products in {} batches",
            generation,
            products.len(),
            batches
        );
        RenderOutcome::Completed { batches }
    }

    async fn materialize(&self, product: &Product) -> Card {
        let location = self.resolver.resolve(&product.code).await;
        let image = self.resolver.path_of(&location).to_path_buf();
        Card::new(product, image, &self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::probe::ImageProbe;
    use crate::photo::resolver::tests::RecordingProbe;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn products(codes: &[&str]) -> Vec<Arc<Product>> {
        codes
            .iter()
            .map(|code| {
                Arc::new(Product {
                    code: code.to_string(),
                    category: "Tools".to_string(),
                    lines: [format!("{} line", code), String::new(), String::new(), String::new()],
                    price: "10".to_string(),
                })
            })
            .collect()
    }

    fn renderer(probe: Arc<dyn ImageProbe>, batch_size: usize) -> BatchRenderer {
        let config = Config {
            batch_size,
            ..Config::default()
        };
        let resolver = Arc::new(ImageResolver::new(Path::new("/catalog"), &config, probe));
        BatchRenderer::new(resolver, &config)
    }

    fn code_of(path: &Path) -> String {
        path.file_stem().unwrap().to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_empty_list_signals_empty() {
        let renderer = renderer(Arc::new(RecordingProbe::default()), 12);
        let mut events: Vec<RenderEvent> = Vec::new();

        let generation = renderer.begin();
        let outcome = renderer.render(generation, &[], &mut events).await;

        assert_eq!(outcome, RenderOutcome::Empty);
        assert_eq!(
            events,
            vec![
                RenderEvent::Cleared { generation },
                RenderEvent::Empty { generation },
            ]
        );
    }

    #[tokio::test]
    async fn test_batches_in_order() {
        let probe = Arc::new(RecordingProbe::with_existing([PathBuf::from("/catalog/FOTOS2/c.jpg")]));
        let renderer = renderer(probe.clone(), 2);
        let list = products(&["a", "b", "c", "d", "e"]);
        let mut events: Vec<RenderEvent> = Vec::new();

        let generation = renderer.begin();
        let outcome = renderer.render(generation, &list, &mut events).await;
        assert_eq!(outcome, RenderOutcome::Completed { batches: 3 });

        assert_eq!(events.first(), Some(&RenderEvent::Cleared { generation }));
        assert_eq!(
            events.last(),
            Some(&RenderEvent::Finished { generation, batches: 3 })
        );

        let batches: Vec<Vec<String>> = events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Batch { cards, .. } => {
                    Some(cards.iter().map(|card| card.code.clone()).collect())
                }
                _ => None,
            })
            .collect();
        assert_eq!(batches, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);

        let cards: Vec<&Card> = events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Batch { cards, .. } => Some(cards.iter()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(cards[2].image, PathBuf::from("/catalog/FOTOS2/c.jpg"));
        assert_eq!(cards[0].image, PathBuf::from("/catalog/noimg.jpg"));
        assert_eq!(cards[0].price, "$ 10");
    }

    #[tokio::test]
    async fn test_next_batch_waits_for_previous() {
        let probe = Arc::new(RecordingProbe::default());
        let renderer = renderer(probe.clone(), 3);
        let list = products(&["a", "b", "c", "d", "e", "f", "g"]);

        let generation = renderer.begin();
        renderer
            .render(generation, &list, &mut Vec::<RenderEvent>::new())
            .await;

        let batch_of = |code: &str| match code {
            "a" | "b" | "c" => 0,
            "d" | "e" | "f" => 1,
            _ => 2,
        };
        let order: Vec<usize> = probe.calls().iter().map(|p| batch_of(&code_of(p))).collect();

        // Every code misses all six folders
        assert_eq!(order.len(), 7 * 6);
        assert!(order.windows(2).all(|w| w[0] <= w[1]), "batches interleaved: {:?}", order);
    }

    #[tokio::test]
    async fn test_stale_pass_emits_nothing() {
        let renderer = renderer(Arc::new(RecordingProbe::default()), 12);
        let stale = renderer.begin();
        let current = renderer.begin();
        let mut events: Vec<RenderEvent> = Vec::new();

        let outcome = renderer.render(stale, &products(&["a"]), &mut events).await;
        assert_eq!(outcome, RenderOutcome::Superseded);
        assert!(events.is_empty());
        assert!(renderer.generations().is_current(current));
    }

    /// Starts a new generation the first time it is asked about a photo
    struct SupersedingProbe {
        generations: Mutex<Option<GenerationCounter>>,
    }

    impl ImageProbe for SupersedingProbe {
        fn is_loadable(&self, _path: &Path) -> bool {
            if let Some(generations) = self.generations.lock().unwrap().take() {
                generations.advance();
            }
            false
        }
    }

    #[tokio::test]
    async fn test_pass_superseded_mid_flight_is_discarded() {
        let probe = Arc::new(SupersedingProbe {
            generations: Mutex::new(None),
        });
        let renderer = renderer(probe.clone(), 1);
        *probe.generations.lock().unwrap() = Some(renderer.generations().clone());

        let mut events: Vec<RenderEvent> = Vec::new();
        let generation = renderer.begin();
        let outcome = renderer.render(generation, &products(&["a", "b"]), &mut events).await;

        assert_eq!(outcome, RenderOutcome::Superseded);
        // Cleared went out before the newer pass began; no cards followed
        assert_eq!(events, vec![RenderEvent::Cleared { generation }]);
    }

    #[test]
    fn test_event_generation() {
        let event = RenderEvent::Batch {
            generation: 7,
            index: 0,
            cards: Vec::new(),
        };
        assert_eq!(event.generation(), 7);
    }
}
