//! One loaded animation scene: its node graph, time span, color and hidden nodes.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::color::Color;
use crate::error::LoadError;
use crate::provider::{FrameSpan, NodeId, SceneGraph, SceneLoader};
use crate::types::Frame;

/// `child name -> parent name` for every non-root node, in depth-first pre-order.
pub type NodeHierarchy = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

pub struct SceneHandle {
    path: PathBuf,
    graph: Option<Box<dyn SceneGraph>>,
    stack_name: Option<String>,
    span: FrameSpan,
    display_color: Color,
    hidden_nodes: HashSet<String>,
}

impl SceneHandle {
    /// Open `path` through `loader`. A scene without animation stacks loads
    /// fine and spans frame 0 only.
    pub fn load(path: impl AsRef<Path>, loader: &dyn SceneLoader) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let graph = loader.open(path)?;
        Ok(Self::from_graph(path, graph))
    }

    /// Wrap an already opened graph. The first enumerated stack is the primary one.
    pub fn from_graph(path: impl Into<PathBuf>, graph: Box<dyn SceneGraph>) -> Self {
        let primary = graph.animation_stacks().into_iter().next();
        let (stack_name, span) = match primary {
            Some(stack) => (Some(stack.name), stack.span),
            None => (None, FrameSpan::default()),
        };
        SceneHandle {
            path: path.into(),
            graph: Some(graph),
            stack_name,
            span,
            display_color: Color::WHITE,
            hidden_nodes: HashSet::new(),
        }
    }

    /// Release the provider's resources. Safe to call more than once.
    pub fn unload(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            graph.close();
            log::debug!("unloaded {}", self.path.display());
        }
    }

    pub fn load_state(&self) -> LoadState {
        if self.graph.is_some() {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn graph(&self) -> Option<&dyn SceneGraph> {
        self.graph.as_deref()
    }

    pub fn animation_stack_name(&self) -> Option<&str> {
        self.stack_name.as_deref()
    }

    pub fn start_frame(&self) -> Frame {
        self.span.start
    }

    pub fn end_frame(&self) -> Frame {
        self.span.end
    }

    pub fn span(&self) -> FrameSpan {
        self.span
    }

    /// Depth-first pre-order `child -> parent` names. The root is never a key.
    pub fn hierarchy(&self) -> NodeHierarchy {
        let mut hierarchy = NodeHierarchy::new();
        let Some(graph) = self.graph() else {
            return hierarchy;
        };
        for node in preorder(graph) {
            if let Some(parent) = graph.parent(node) {
                hierarchy.insert(graph.name(node).to_string(), graph.name(parent).to_string());
            }
        }
        hierarchy
    }

    /// Every node, root first, depth-first pre-order. Recomputed on each call.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.graph().map(preorder).unwrap_or_default()
    }

    pub fn display_color(&self) -> Color {
        self.display_color
    }

    pub fn set_display_color(&mut self, color: Color) {
        self.display_color = color;
    }

    pub fn hidden_nodes(&self) -> &HashSet<String> {
        &self.hidden_nodes
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden_nodes.contains(name)
    }

    pub fn hide_node(&mut self, name: impl Into<String>) {
        self.hidden_nodes.insert(name.into());
    }

    /// No-op if `name` is not hidden.
    pub fn show_node(&mut self, name: &str) {
        self.hidden_nodes.remove(name);
    }
}

impl Drop for SceneHandle {
    fn drop(&mut self) {
        self.unload();
    }
}

impl fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneHandle")
            .field("path", &self.path)
            .field("state", &self.load_state())
            .field("span", &self.span)
            .field("display_color", &self.display_color)
            .field("hidden_nodes", &self.hidden_nodes)
            .finish()
    }
}

/// Depth-first pre-order walk from the root.
pub(crate) fn preorder(graph: &dyn SceneGraph) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![graph.root()];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(graph.children(node).iter().rev());
    }
    order
}
