//! The capability interface every animation backend exposes to the browser.
//!
//! The skeleton sampler and the hierarchy walker only ever talk to a
//! [`SceneGraph`]; file formats live behind a [`SceneLoader`].

use std::path::Path;

use crate::error::LoadError;
use crate::types::{Frame, Position};

/// Handle of a node inside one [`SceneGraph`].
pub type NodeId = usize;

/// Inclusive frame range of an animation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSpan {
    pub start: Frame,
    pub end: Frame,
}

impl FrameSpan {
    pub fn new(start: Frame, end: Frame) -> Self {
        FrameSpan { start, end }
    }
}

/// A named take inside a scene, with the frame range it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStack {
    pub name: String,
    pub span: FrameSpan,
}

/// A loaded, immutable node hierarchy that can be sampled over time.
pub trait SceneGraph: Send + Sync {
    fn root(&self) -> NodeId;

    /// Ordered children of `node`.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn name(&self, node: NodeId) -> &str;

    /// World-space translation of `node` at `frame`. Frames outside the
    /// animated range are handled however the backend sees fit.
    fn world_position_at(&self, node: NodeId, frame: Frame) -> Position;

    /// Animation stacks in backend enumeration order. May be empty.
    fn animation_stacks(&self) -> Vec<AnimationStack>;

    /// Release backend resources. Called once when the owning scene unloads.
    fn close(&mut self) {}
}

/// Opens files of one format into [`SceneGraph`]s.
pub trait SceneLoader: Send + Sync {
    /// Recognized file extensions, lower-case and without the dot.
    fn extensions(&self) -> &[&str];

    fn open(&self, path: &Path) -> Result<Box<dyn SceneGraph>, LoadError>;

    /// Whether `path` carries one of [`SceneLoader::extensions`] (case-insensitive).
    fn recognizes(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
