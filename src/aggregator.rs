//! The set of currently loaded scenes, their shared frame range and per-scene
//! visibility.
//!
//! Loading always replaces the whole set. Paths that fail are reported and
//! skipped; if nothing at all loads, the previous set stays untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Color;
use crate::error::LoadError;
use crate::playback::PlaybackController;
use crate::provider::SceneLoader;
use crate::sampler::{sample_scenes, BoneSegment};
use crate::scene::{NodeHierarchy, SceneHandle};
use crate::signal::{Signal, SubscriptionId};

/// Structure of every loaded scene, keyed by path in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneHierarchyDescription {
    pub transform_hierarchy: IndexMap<PathBuf, NodeHierarchy>,
}

impl SceneHierarchyDescription {
    pub fn is_empty(&self) -> bool {
        self.transform_hierarchy.is_empty()
    }

    pub fn scene(&self, path: &Path) -> Option<&NodeHierarchy> {
        self.transform_hierarchy.get(path)
    }
}

/// Outcome of one [`SceneAggregator::load`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<PathBuf>,
    pub skipped: Vec<LoadError>,
}

pub struct SceneAggregator {
    loader: Box<dyn SceneLoader>,
    scenes: Vec<SceneHandle>,
    playback: PlaybackController,
    description: SceneHierarchyDescription,
    scene_loaded: Signal<SceneHierarchyDescription>,
    rng: StdRng,
}

impl SceneAggregator {
    pub fn new(loader: impl SceneLoader + 'static) -> Self {
        Self::with_rng(loader, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with reproducible scene colors.
    pub fn with_seed(loader: impl SceneLoader + 'static, seed: u64) -> Self {
        Self::with_rng(loader, StdRng::seed_from_u64(seed))
    }

    fn with_rng(loader: impl SceneLoader + 'static, rng: StdRng) -> Self {
        SceneAggregator {
            loader: Box::new(loader),
            scenes: Vec::new(),
            playback: PlaybackController::new(),
            description: SceneHierarchyDescription::default(),
            scene_loaded: Signal::new(),
            rng,
        }
    }

    pub fn loader(&self) -> &dyn SceneLoader {
        self.loader.as_ref()
    }

    pub fn scenes(&self) -> &[SceneHandle] {
        &self.scenes
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    /// Hierarchy of the current set, as last announced.
    pub fn description(&self) -> &SceneHierarchyDescription {
        &self.description
    }

    /// Called after every successful load with the merged hierarchy.
    pub fn subscribe_scene_loaded(
        &mut self,
        callback: impl FnMut(&SceneHierarchyDescription) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.scene_loaded.subscribe(callback)
    }

    pub fn unsubscribe_scene_loaded(&mut self, id: SubscriptionId) -> bool {
        self.scene_loaded.unsubscribe(id)
    }

    /// Replace the loaded set with `paths`.
    ///
    /// Returns [`LoadError::EmptyInput`] when no path loads; the current set,
    /// frame range and description are then left as they were.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        let mut loaded = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match SceneHandle::load(path, self.loader.as_ref()) {
                Ok(scene) => {
                    report.loaded.push(path.to_path_buf());
                    loaded.push(scene);
                }
                Err(err) => {
                    log::warn!("skipping {}: {err}", path.display());
                    report.skipped.push(err);
                }
            }
        }

        if loaded.is_empty() {
            log::warn!("nothing to load from {} path(s)", paths.len());
            return Err(LoadError::EmptyInput);
        }

        self.clear();

        if loaded.len() > 1 {
            let mut taken = Vec::with_capacity(loaded.len());
            for scene in loaded.iter_mut() {
                let color = Color::random_distinct(&mut self.rng, &taken);
                taken.push(color);
                scene.set_display_color(color);
            }
        }

        let start = loaded.iter().map(SceneHandle::start_frame).min().unwrap_or(0);
        let end = loaded.iter().map(SceneHandle::end_frame).max().unwrap_or(0);
        self.playback.set_range(start, end);

        let mut description = SceneHierarchyDescription::default();
        for scene in &loaded {
            description
                .transform_hierarchy
                .insert(scene.path().to_path_buf(), scene.hierarchy());
        }
        self.scenes = loaded;
        self.description = description;

        log::info!(
            "loaded {} scene(s), frames {start}..={end}",
            self.scenes.len()
        );
        self.scene_loaded.emit(&self.description);
        Ok(report)
    }

    /// Keep only paths the loader recognizes, then [`load`](Self::load) them.
    /// A drop without any recognized file is rejected before anything is unloaded.
    pub fn load_dropped<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<LoadReport, LoadError> {
        let recognized: Vec<&Path> = paths
            .iter()
            .map(|path| path.as_ref())
            .filter(|path| self.loader.recognizes(path))
            .collect();
        if recognized.is_empty() {
            log::warn!(
                "could not find any .{} files in the dropped files",
                self.loader.extensions().join("/.")
            );
            return Err(LoadError::EmptyInput);
        }
        self.load(&recognized)
    }

    /// Unload every scene and reset the frame range.
    pub fn clear(&mut self) {
        for scene in self.scenes.iter_mut() {
            scene.unload();
        }
        self.scenes.clear();
        self.description = SceneHierarchyDescription::default();
        self.playback.set_range(0, 0);
    }

    /// Hide or show `node_names` on every scene loaded from exactly `path`.
    /// Unknown names and repeated requests are harmless.
    pub fn set_node_visibility<S: AsRef<str>>(&mut self, path: &Path, node_names: &[S], hidden: bool) {
        for scene in self.scenes.iter_mut().filter(|scene| scene.path() == path) {
            for name in node_names {
                let name: &str = name.as_ref();
                if hidden {
                    scene.hide_node(name);
                } else {
                    scene.show_node(name);
                }
            }
        }
    }

    /// Whether any scene loaded from `path` hides `node_name`.
    pub fn is_node_hidden(&self, path: &Path, node_name: &str) -> bool {
        self.scenes
            .iter()
            .any(|scene| scene.path() == path && scene.is_hidden(node_name))
    }

    /// Flip `node_name` and every node below it on the scenes loaded from
    /// `path`. Returns the new hidden state, or `None` if no scene has that path.
    pub fn toggle_node_visibility(&mut self, path: &Path, node_name: &str) -> Option<bool> {
        if !self.scenes.iter().any(|scene| scene.path() == path) {
            return None;
        }
        let hidden = !self.is_node_hidden(path, node_name);
        let names = self.subtree_names(path, node_name);
        self.set_node_visibility(path, &names, hidden);
        Some(hidden)
    }

    /// `node_name` followed by its descendants, read off the pre-order description.
    fn subtree_names(&self, path: &Path, node_name: &str) -> Vec<String> {
        let mut names = vec![node_name.to_string()];
        if let Some(hierarchy) = self.description.scene(path) {
            for (child, parent) in hierarchy {
                if names.contains(parent) && !names.contains(child) {
                    names.push(child.clone());
                }
            }
        }
        names
    }

    /// One `(scene path, node name)` row per described node, in description order.
    pub fn node_rows(&self) -> Vec<(&Path, &str)> {
        self.description
            .transform_hierarchy
            .iter()
            .flat_map(|(path, hierarchy)| hierarchy.keys().map(move |name| (path.as_path(), name.as_str())))
            .collect()
    }

    /// Bone segments of every scene at the active frame.
    pub fn sample_current_frame(&self) -> Vec<BoneSegment> {
        sample_scenes(&self.scenes, self.playback.active_frame())
    }
}

impl fmt::Debug for SceneAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneAggregator")
            .field("scenes", &self.scenes)
            .field("playback", &self.playback)
            .finish()
    }
}
