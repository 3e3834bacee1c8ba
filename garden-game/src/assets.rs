//! Fire-and-forget image loading.
use std::collections::HashSet;

use crate::constants::BACKGROUND_ASSET;
use crate::species::SpeciesId;

/// Image handles keyed by asset path.
///
/// `is_ready` requests the load on first sight and reports whether the image
/// can be drawn this frame. A failed load simply never becomes ready.
pub trait ImageCache {
    fn is_ready(&mut self, path: &str) -> bool;
}

/// Every asset the garden may draw.
#[must_use]
pub fn preload_paths() -> Vec<String> {
    std::iter::once(BACKGROUND_ASSET.to_string())
        .chain(SpeciesId::all().map(SpeciesId::icon_path))
        .collect()
}

/// Image cache with an explicit set of ready paths, used headlessly.
#[derive(Debug, Clone, Default)]
pub struct StaticImages {
    ready: HashSet<String>,
    requested: Vec<String>,
}

impl StaticImages {
    /// A cache in which nothing ever loads.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A cache in which every known asset is loaded.
    #[must_use]
    pub fn all() -> Self {
        Self {
            ready: preload_paths().into_iter().collect(),
            requested: Vec::new(),
        }
    }

    pub fn mark_ready(&mut self, path: &str) {
        self.ready.insert(path.to_string());
    }

    /// Paths requested while not ready, in first-request order.
    #[must_use]
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl ImageCache for StaticImages {
    fn is_ready(&mut self, path: &str) -> bool {
        if self.ready.contains(path) {
            return true;
        }
        if !self.requested.iter().any(|seen| seen == path) {
            self.requested.push(path.to_string());
        }
        false
    }
}
