/// Per-window browsing state: which category is shown, what is being
/// searched, and the pending debounced search.
use std::future::Future;
use std::time::Duration;

/// What the product grid is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing selected yet (catalog loading or empty)
    Nothing,
    /// All products of one category
    Category(String),
    /// Results of a text search
    Search(String),
}

/// Delays an action until input has been quiet for `delay`.
///
/// Every call to [`Debouncer::schedule`] supersedes the previous one; a timer
/// that fires with an outdated ticket is ignored.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: u64,
    pending: bool,
}

/// Identifies one scheduled action of a [`Debouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: 0,
            pending: false,
        }
    }

    /// Replace any pending action with a new one.
    ///
    /// Returns the ticket and a timer that completes after the quiet period.
    pub fn schedule(&mut self) -> (Ticket, impl Future<Output = ()> + Send + 'static) {
        self.latest += 1;
        self.pending = true;
        let delay = self.delay;
        (Ticket(self.latest), async move { tokio::time::sleep(delay).await })
    }

    /// Drop the pending action, if any
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    /// Called when a timer completes. Returns true only for the latest
    /// scheduled ticket, and only once.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending && ticket.0 == self.latest {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Explicit session context owned by the application
#[derive(Debug)]
pub struct Session {
    /// Last category the user picked; restored when a search is cleared
    pub selected_category: Option<String>,
    /// What the grid shows right now
    pub view: View,
    /// Raw contents of the search box
    pub query: String,
    pub search_debounce: Debouncer,
    /// Whether the collapsible category menu is open (narrow windows)
    pub menu_open: bool,
}

impl Session {
    pub fn new(debounce_delay: Duration) -> Self {
        Self {
            selected_category: None,
            view: View::Nothing,
            query: String::new(),
            search_debounce: Debouncer::new(debounce_delay),
            menu_open: false,
        }
    }

    /// Switch to a category. Clears the search box and any pending search.
    pub fn select_category(&mut self, category: &str) {
        self.selected_category = Some(category.to_string());
        self.view = View::Category(category.to_string());
        self.query.clear();
        self.search_debounce.cancel();
    }

    /// Show search results for `query`; no category is active meanwhile
    pub fn begin_search(&mut self, query: &str) {
        self.view = View::Search(query.to_string());
    }

    /// Category highlighted in the sidebar, none while searching
    pub fn active_category(&self) -> Option<&str> {
        match &self.view {
            View::Category(category) => Some(category),
            _ => None,
        }
    }
}
