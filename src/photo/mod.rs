/// Product photo lookup
///
/// This module handles:
/// - Building candidate photo paths from the configured folders
/// - Testing whether a candidate is a loadable image
/// - Caching the resolved location per product code

pub mod probe;
pub mod resolver;

pub use resolver::ImageResolver;
