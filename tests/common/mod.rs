//! In-memory scene provider shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mocap_browser::types::{Frame, Position};
use mocap_browser::{AnimationStack, FrameSpan, LoadError, NodeId, SceneGraph, SceneLoader};

/// Node positions are `(node id, frame, depth)` so tests can tell them apart.
#[derive(Debug, Clone)]
pub struct MockScene {
    names: Vec<String>,
    parents: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
    depths: Vec<usize>,
    stacks: Vec<AnimationStack>,
    closed: Arc<AtomicUsize>,
}

impl MockScene {
    /// `edges` are `(child, parent)` in the order children should appear.
    pub fn new(root: &str, edges: &[(&str, &str)], span: Option<(Frame, Frame)>) -> Self {
        let mut scene = MockScene {
            names: vec![root.to_string()],
            parents: vec![None],
            children: vec![Vec::new()],
            depths: vec![0],
            stacks: span
                .map(|(start, end)| {
                    vec![
                        AnimationStack {
                            name: "Take 001".to_string(),
                            span: FrameSpan::new(start, end),
                        },
                        AnimationStack {
                            name: "Take 002".to_string(),
                            span: FrameSpan::new(-1000, 1000),
                        },
                    ]
                })
                .unwrap_or_default(),
            closed: Arc::new(AtomicUsize::new(0)),
        };
        for (child, parent) in edges {
            let parent_id = scene
                .names
                .iter()
                .position(|name| name == parent)
                .unwrap_or_else(|| panic!("parent {parent} must be declared before {child}"));
            let id = scene.names.len();
            scene.names.push(child.to_string());
            scene.parents.push(Some(parent_id));
            scene.children.push(Vec::new());
            scene.depths.push(scene.depths[parent_id] + 1);
            scene.children[parent_id].push(id);
        }
        scene
    }

    /// A small humanoid: Root -> Hips -> {Spine -> Neck -> Head, LeftLeg, RightLeg}.
    pub fn humanoid(span: Option<(Frame, Frame)>) -> Self {
        MockScene::new(
            "Root",
            &[
                ("Hips", "Root"),
                ("Spine", "Hips"),
                ("Neck", "Spine"),
                ("Head", "Neck"),
                ("LeftLeg", "Hips"),
                ("RightLeg", "Hips"),
            ],
            span,
        )
    }

    pub fn id_of(&self, name: &str) -> NodeId {
        self.names.iter().position(|n| n == name).unwrap()
    }

    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closed)
    }
}

impl SceneGraph for MockScene {
    fn root(&self) -> NodeId {
        0
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.children[node]
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents[node]
    }

    fn name(&self, node: NodeId) -> &str {
        &self.names[node]
    }

    fn world_position_at(&self, node: NodeId, frame: Frame) -> Position {
        Position::new(node as f64, frame as f64, self.depths[node] as f64)
    }

    fn animation_stacks(&self) -> Vec<AnimationStack> {
        self.stacks.clone()
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Scene(MockScene),
    Broken,
}

/// Serves [`MockScene`]s by path; unknown paths are "missing".
#[derive(Debug, Clone, Default)]
pub struct MockLoader {
    entries: HashMap<PathBuf, Entry>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scene(mut self, path: &str, scene: MockScene) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Scene(scene));
        self
    }

    pub fn with_broken(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Broken);
        self
    }
}

impl SceneLoader for MockLoader {
    fn extensions(&self) -> &[&str] {
        &["anim"]
    }

    fn open(&self, path: &Path) -> Result<Box<dyn SceneGraph>, LoadError> {
        match self.entries.get(path) {
            Some(Entry::Scene(scene)) => Ok(Box::new(scene.clone())),
            Some(Entry::Broken) => Err(LoadError::ParseFailure {
                path: path.to_path_buf(),
                reason: "not an animation".to_string(),
            }),
            None => Err(LoadError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}
