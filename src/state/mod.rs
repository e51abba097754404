/// State management module
///
/// This module handles all application state, including:
/// - The parsed product table and its categories (catalog.rs)
/// - Shared data structures (data.rs)
/// - Browsing session: selected category, search, debounce (session.rs)

pub mod catalog;
pub mod data;
pub mod session;
