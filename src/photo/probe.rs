use image::ImageReader;
use std::path::Path;

/// Tests whether an image exists at a location and can be loaded.
///
/// Probes are blocking and run on the blocking thread pool. A probe never
/// fails: anything that prevents loading is simply `false`.
pub trait ImageProbe: Send + Sync {
    fn is_loadable(&self, path: &Path) -> bool;
}

/// Probe backed by the filesystem and the `image` crate.
///
/// Only the header is decoded, which is enough to reject missing files,
/// truncated files and files that are not images at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProbe;

impl ImageProbe for FileProbe {
    fn is_loadable(&self, path: &Path) -> bool {
        let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader,
            Err(_) => return false,
        };

        match reader.into_dimensions() {
            Ok((width, height)) => {
                log::trace!("Found {} ({}x{})", path.display(), width, height);
                true
            }
            Err(e) => {
                log::debug!("Unloadable image {}: {}", path.display(), e);
                false
            }
        }
    }
}
