use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::probe::{FileProbe, ImageProbe};
use crate::config::Config;

/// Where the photo of a product lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// First candidate folder holding a loadable `<code>.<ext>`
    Found(PathBuf),
    /// No candidate matched; show the fallback image
    Fallback,
}

/// Resolves product codes to photo locations.
///
/// Candidate folders are probed one after another in their configured
/// order and the first loadable image wins. Results, including fallbacks,
/// are cached for the rest of the session, so each code costs I/O once.
///
/// Two concurrent resolves of the same uncached code both probe and both
/// write the same answer; that race is harmless and left alone.
pub struct ImageResolver {
    folders: Vec<PathBuf>,
    extension: String,
    fallback: PathBuf,
    probe: Arc<dyn ImageProbe>,
    cache: RwLock<HashMap<String, ImageLocation>>,
}

impl ImageResolver {
    /// Resolver probing the real filesystem under `root`
    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self::new(root, config, Arc::new(FileProbe))
    }

    pub fn new(root: &Path, config: &Config, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            folders: config.photo_folders.iter().map(|f| root.join(f)).collect(),
            extension: config.image_extension.clone(),
            fallback: root.join(&config.fallback_image),
            probe,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the photo for `code`, probing only on a cache miss
    pub async fn resolve(&self, code: &str) -> ImageLocation {
        if let Some(location) = self.cached(code) {
            return location;
        }

        let mut location = ImageLocation::Fallback;
        for candidate in self.candidates(code) {
            if self.probe(candidate.clone()).await {
                location = ImageLocation::Found(candidate);
                break;
            }
        }

        match &location {
            ImageLocation::Found(path) => log::debug!("📷 {} -> {}", code, path.display()),
            ImageLocation::Fallback => log::debug!("📷 {} -> fallback", code),
        }

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code.to_string(), location.clone());

        location
    }

    /// Candidate locations for `code`, in probe order.
    ///
    /// Codes that are empty or would escape the photo folders have none.
    pub fn candidates(&self, code: &str) -> Vec<PathBuf> {
        if !is_plain_file_stem(code) {
            return Vec::new();
        }

        let file_name = format!("{}.{}", code, self.extension);
        self.folders.iter().map(|folder| folder.join(&file_name)).collect()
    }

    /// Cached result for `code`, without probing
    pub fn cached(&self, code: &str) -> Option<ImageLocation> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// Number of codes resolved so far
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Path to display for a resolved location
    pub fn path_of<'a>(&'a self, location: &'a ImageLocation) -> &'a Path {
        match location {
            ImageLocation::Found(path) => path,
            ImageLocation::Fallback => &self.fallback,
        }
    }

    /// Run one probe on the blocking pool. A panicking probe counts as a miss.
    async fn probe(&self, path: PathBuf) -> bool {
        let probe = Arc::clone(&self.probe);
        match tokio::task::spawn_blocking(move || probe.is_loadable(&path)).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Image probe task failed: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver")
            .field("folders", &self.folders)
            .field("extension", &self.extension)
            .field("fallback", &self.fallback)
            .field("cached", &self.cached_len())
            .finish()
    }
}

fn is_plain_file_stem(code: &str) -> bool {
    !code.is_empty()
        && code != "."
        && code != ".."
        && !code.contains(['/', '\\'])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Fake probe: `existing` paths are loadable, every call is recorded
    #[derive(Default)]
    pub(crate) struct RecordingProbe {
        pub existing: HashSet<PathBuf>,
        pub calls: Mutex<Vec<PathBuf>>,
    }

    impl RecordingProbe {
        pub fn with_existing(paths: impl IntoIterator<Item = PathBuf>) -> Self {
            Self {
                existing: paths.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ImageProbe for RecordingProbe {
        fn is_loadable(&self, path: &Path) -> bool {
            self.calls.lock().unwrap().push(path.to_path_buf());
            self.existing.contains(path)
        }
    }

    struct PanickingProbe;

    impl ImageProbe for PanickingProbe {
        fn is_loadable(&self, _path: &Path) -> bool {
            panic!("decoder exploded");
        }
    }

    fn root() -> PathBuf {
        PathBuf::from("/catalog")
    }

    #[tokio::test]
    async fn test_first_existing_folder_wins() {
        let config = Config::default();
        let probe = Arc::new(RecordingProbe::with_existing([
            root().join("FOTOS3/A1.jpg"),
            root().join("FOTOS5/A1.jpg"),
        ]));
        let resolver = ImageResolver::new(&root(), &config, probe.clone());

        let location = resolver.resolve("A1").await;

        assert_eq!(location, ImageLocation::Found(root().join("FOTOS3/A1.jpg")));
        // Probed in order and stopped at the first hit
        assert_eq!(
            probe.calls(),
            vec![
                root().join("FOTOS1/A1.jpg"),
                root().join("FOTOS2/A1.jpg"),
                root().join("FOTOS3/A1.jpg"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_then_cache_hit() {
        let config = Config::default();
        let probe = Arc::new(RecordingProbe::default());
        let resolver = ImageResolver::new(&root(), &config, probe.clone());

        let location = resolver.resolve("Z9").await;
        assert_eq!(location, ImageLocation::Fallback);
        assert_eq!(resolver.path_of(&location), root().join("noimg.jpg"));
        assert_eq!(probe.calls().len(), 6);

        // Second resolve performs zero probes
        assert_eq!(resolver.resolve("Z9").await, ImageLocation::Fallback);
        assert_eq!(probe.calls().len(), 6);
        assert_eq!(resolver.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_found_is_cached() {
        let config = Config::default();
        let probe = Arc::new(RecordingProbe::with_existing([root().join("FOTOS1/B2.jpg")]));
        let resolver = ImageResolver::new(&root(), &config, probe.clone());

        resolver.resolve("B2").await;
        resolver.resolve("B2").await;
        assert_eq!(probe.calls().len(), 1);
        assert_eq!(
            resolver.cached("B2"),
            Some(ImageLocation::Found(root().join("FOTOS1/B2.jpg")))
        );
    }

    #[tokio::test]
    async fn test_unsafe_codes_never_probe() {
        let config = Config::default();
        let probe = Arc::new(RecordingProbe::default());
        let resolver = ImageResolver::new(&root(), &config, probe.clone());

        assert_eq!(resolver.resolve("").await, ImageLocation::Fallback);
        assert_eq!(resolver.resolve("../secret").await, ImageLocation::Fallback);
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_probe_is_a_miss() {
        let config = Config::default();
        let resolver = ImageResolver::new(&root(), &config, Arc::new(PanickingProbe));

        assert_eq!(resolver.resolve("A1").await, ImageLocation::Fallback);
    }

    #[tokio::test]
    async fn test_custom_folders_and_extension() {
        let config = Config {
            photo_folders: vec![PathBuf::from("big"), PathBuf::from("small")],
            image_extension: "png".to_string(),
            ..Config::default()
        };
        let probe = Arc::new(RecordingProbe::with_existing([root().join("small/C3.png")]));
        let resolver = ImageResolver::new(&root(), &config, probe.clone());

        assert_eq!(
            resolver.resolve("C3").await,
            ImageLocation::Found(root().join("small/C3.png"))
        );
    }

    #[tokio::test]
    async fn test_file_probe_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("FOTOS2")).unwrap();
        image::RgbImage::new(2, 2)
            .save(dir.path().join("FOTOS2/D4.jpg"))
            .unwrap();

        let resolver = ImageResolver::from_config(dir.path(), &Config::default());
        assert_eq!(
            resolver.resolve("D4").await,
            ImageLocation::Found(dir.path().join("FOTOS2/D4.jpg"))
        );
        assert_eq!(resolver.resolve("E5").await, ImageLocation::Fallback);
    }
}
