use env_logger::Env;
use futures::channel::mpsc;
use iced::widget::{column, container, row, text, text_input};
use iced::{Element, Length, Subscription, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod error;
mod photo;
mod render;
mod state;
mod ui;

use config::Config;
use photo::ImageResolver;
use render::{BatchRenderer, Generation, RenderEvent, RenderOutcome};
use state::catalog::Catalog;
use state::data::Product;
use state::session::{Session, Ticket, View};
use ui::grid::Grid;

/// Where the catalog is in its one-time startup load
#[derive(Debug)]
enum Phase {
    Loading,
    /// Loading failed; the message replaces the whole grid
    Failed(String),
    Ready(Arc<Catalog>),
}

/// Main application state
struct CatalogBrowser {
    /// Directory holding the product table and the photo folders
    root: PathBuf,
    config: Config,
    phase: Phase,
    session: Session,
    renderer: BatchRenderer,
    /// Cards of the current render pass
    grid: Grid,
    window_width: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Background catalog read completed
    CatalogLoaded(Result<Arc<Catalog>, String>),
    /// User picked a category in the sidebar
    SelectCategory(String),
    /// Search box contents changed
    SearchChanged(String),
    /// Debounce timer for a search expired
    SearchDue(Ticket),
    /// User clicked the clear button of the search box
    ClearSearch,
    /// User clicked the menu button (narrow windows)
    ToggleMenu,
    /// Display update from a render pass
    Rendered(RenderEvent),
    /// A render pass ended
    RenderDone(Generation, RenderOutcome),
    WindowResized(f32),
}

const INITIAL_WINDOW_SIZE: (f32, f32) = (1200.0, 800.0);

impl CatalogBrowser {
    /// Create the application and start reading the catalog
    fn new(root: PathBuf, config: Config) -> (Self, Task<Message>) {
        let resolver = Arc::new(ImageResolver::from_config(&root, &config));
        let renderer = BatchRenderer::new(resolver, &config);
        let session = Session::new(config.debounce_delay());

        let catalog_path = root.join(&config.catalog_file);
        log::info!("🛒 Opening catalog {}", catalog_path.display());

        let load = Task::perform(
            async move {
                Catalog::load(&catalog_path)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            },
            Message::CatalogLoaded,
        );

        (
            CatalogBrowser {
                root,
                config,
                phase: Phase::Loading,
                session,
                renderer,
                grid: Grid::default(),
                window_width: INITIAL_WINDOW_SIZE.0,
            },
            load,
        )
    }

    fn title(&self) -> String {
        match &self.session.view {
            View::Category(category) => format!("Catalog · {}", category),
            View::Search(query) => format!("Catalog · \"{}\"", query),
            View::Nothing => format!("Catalog · {}", self.root.display()),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(Ok(catalog)) => {
                if catalog.is_empty() {
                    log::warn!("Catalog has no products");
                }
                let first = catalog.first_category().map(str::to_string);
                self.phase = Phase::Ready(catalog);

                match first {
                    Some(category) => self.show_category(category),
                    None => {
                        log::warn!("Catalog has no categories, nothing to show");
                        Task::none()
                    }
                }
            }
            Message::CatalogLoaded(Err(error)) => {
                log::error!("❌ Error loading catalog: {}", error);
                self.phase = Phase::Failed(error);
                Task::none()
            }
            Message::SelectCategory(category) => {
                if self.is_narrow() {
                    self.session.menu_open = false;
                }
                self.show_category(category)
            }
            Message::SearchChanged(value) => {
                let empty = value.trim().is_empty();
                self.session.query = value;

                if empty {
                    // Clearing bypasses the debounce and restores the category
                    if self.session.search_debounce.is_pending() {
                        log::debug!("Search cleared, pending search dropped");
                    }
                    self.session.search_debounce.cancel();
                    return self.restore_category();
                }

                let (ticket, timer) = self.session.search_debounce.schedule();
                Task::perform(timer, move |_| Message::SearchDue(ticket))
            }
            Message::SearchDue(ticket) => {
                if !self.session.search_debounce.fire(ticket) {
                    return Task::none();
                }
                let query = self.session.query.trim().to_string();
                self.search(query)
            }
            Message::ClearSearch => {
                self.session.search_debounce.cancel();
                self.session.query.clear();
                Task::batch([
                    self.restore_category(),
                    text_input::focus(ui::header::search_input_id()),
                ])
            }
            Message::ToggleMenu => {
                self.session.menu_open = !self.session.menu_open;
                Task::none()
            }
            Message::Rendered(event) => {
                self.grid.apply(event);
                Task::none()
            }
            Message::RenderDone(generation, outcome) => {
                match outcome {
                    RenderOutcome::Completed { batches } => {
                        log::debug!("Render pass {} completed in {} batches", generation, batches)
                    }
                    other => log::debug!("Render pass {} ended: {:?}", generation, other),
                }
                Task::none()
            }
            Message::WindowResized(width) => {
                self.window_width = width;
                if !self.is_narrow() {
                    self.session.menu_open = false;
                }
                Task::none()
            }
        }
    }

    /// Switch the grid to every product of `category`
    fn show_category(&mut self, category: String) -> Task<Message> {
        let Phase::Ready(catalog) = &self.phase else {
            return Task::none();
        };
        let products = catalog.by_category(&category);
        self.session.select_category(&category);
        self.start_render(products)
    }

    /// Back to the last selected category after a search was cleared
    fn restore_category(&mut self) -> Task<Message> {
        match self.session.selected_category.clone() {
            Some(category) => self.show_category(category),
            None => Task::none(),
        }
    }

    fn search(&mut self, query: String) -> Task<Message> {
        let Phase::Ready(catalog) = &self.phase else {
            return Task::none();
        };
        let results = catalog.search(&query);
        log::debug!("🔍 \"{}\": {} results", query, results.len());
        self.session.begin_search(&query);
        self.start_render(results)
    }

    /// Launch a render pass. Events from older passes are ignored from now on.
    fn start_render(&mut self, products: Vec<Arc<Product>>) -> Task<Message> {
        let generation = self.renderer.begin();
        self.grid.start(generation);

        let (mut surface, events) = mpsc::unbounded();
        let renderer = self.renderer.clone();
        let pass = Task::perform(
            async move { renderer.render(generation, &products, &mut surface).await },
            move |outcome| Message::RenderDone(generation, outcome),
        );

        Task::batch([Task::run(events, Message::Rendered), pass])
    }

    fn is_narrow(&self) -> bool {
        self.window_width <= self.config.narrow_width
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let narrow = self.is_narrow();
        let accent = ui::theme::accent(self.session.active_category());
        let header = ui::header::view(&self.session.query, narrow, accent);

        let body: Element<Message> = match &self.phase {
            Phase::Loading => ui::loading(),
            Phase::Failed(error) => ui::load_error(error),
            Phase::Ready(catalog) => {
                let active = self.session.active_category();
                if narrow {
                    if self.session.menu_open {
                        ui::sidebar::view(catalog.categories(), active, Length::Fill)
                    } else {
                        self.grid.view()
                    }
                } else {
                    row![
                        ui::sidebar::view(catalog.categories(), active, Length::Fixed(220.0)),
                        self.grid.view(),
                    ]
                    .height(Length::Fill)
                    .into()
                }
            }
        };

        let footer = text(format!("{} photos resolved", self.renderer.resolver().cached_len())).size(12);

        container(column![header, body, footer].spacing(8))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(12)
            .into()
    }

    /// Track window width for the collapsible menu
    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size.width))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Panics are logged, never shown to the user
    std::panic::set_hook(Box::new(|info| {
        log::error!("Unhandled panic: {}", info);
    }));

    let root = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::load(&root).unwrap_or_else(|e| {
        log::warn!("⚠️  {}; using default configuration", e);
        Config::default()
    });

    iced::application(CatalogBrowser::title, CatalogBrowser::update, CatalogBrowser::view)
        .theme(CatalogBrowser::theme)
        .subscription(CatalogBrowser::subscription)
        .window_size(INITIAL_WINDOW_SIZE)
        .centered()
        .run_with(move || CatalogBrowser::new(root, config))
}
