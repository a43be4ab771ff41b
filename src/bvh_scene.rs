//! [`SceneGraph`] adapter over a parsed .bvh file.

use std::path::Path;

use cgmath::{Rotation, Zero};

use crate::error::LoadError;
use crate::parse::load_bvh_from_file;
use crate::provider::{AnimationStack, FrameSpan, NodeId, SceneGraph, SceneLoader};
use crate::types::{BvhData, BvhMetadata, Frame, Index, Position};
use crate::utils::frame_index;

/// Name of the synthetic node every .bvh skeleton hangs from.
pub const SCENE_ROOT_NAME: &str = "RootNode";

#[derive(Debug, Clone, Copy)]
enum NodeSource {
    SceneRoot,
    Joint(Index),
    EndSite(Index),
}

#[derive(Debug)]
struct NodeRecord {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    source: NodeSource,
}

/// Node graph of one .bvh file: a `RootNode` at the origin, one node per
/// joint and one `<joint>_End` leaf per End Site.
#[derive(Debug)]
pub struct BvhScene {
    take_name: String,
    metadata: BvhMetadata,
    data: BvhData,
    nodes: Vec<NodeRecord>,
}

impl BvhScene {
    pub fn new(take_name: impl Into<String>, metadata: BvhMetadata, data: BvhData) -> Self {
        let mut nodes = vec![NodeRecord {
            name: SCENE_ROOT_NAME.to_string(),
            parent: None,
            children: Vec::new(),
            source: NodeSource::SceneRoot,
        }];
        let roots: Vec<Index> = metadata
            .joints
            .iter()
            .filter(|joint| joint.parent_index.is_none())
            .map(|joint| joint.index)
            .collect();
        for root in roots {
            Self::add_joint(&metadata, root, 0, &mut nodes);
        }
        BvhScene {
            take_name: take_name.into(),
            metadata,
            data,
            nodes,
        }
    }

    fn add_joint(metadata: &BvhMetadata, joint: Index, parent: NodeId, nodes: &mut Vec<NodeRecord>) {
        let id = nodes.len();
        let record = &metadata.joints[joint];
        nodes.push(NodeRecord {
            name: record.name.clone(),
            parent: Some(parent),
            children: Vec::new(),
            source: NodeSource::Joint(joint),
        });
        nodes[parent].children.push(id);

        for &child in &record.children {
            Self::add_joint(metadata, child, id, nodes);
        }
        if record.endsite.is_some() {
            let end_id = nodes.len();
            let name = Self::end_site_name(metadata, nodes, &record.name);
            nodes.push(NodeRecord {
                name,
                parent: Some(id),
                children: Vec::new(),
                source: NodeSource::EndSite(joint),
            });
            nodes[id].children.push(end_id);
        }
    }

    /// `<joint>_End`, numbered when a joint or earlier node already has that name.
    fn end_site_name(metadata: &BvhMetadata, nodes: &[NodeRecord], joint_name: &str) -> String {
        let taken = |name: &str| {
            metadata.find_joint_by_name(name).is_some() || nodes.iter().any(|node| node.name == name)
        };
        let base = format!("{joint_name}_End");
        let mut name = base.clone();
        let mut n = 1;
        while taken(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        name
    }

    pub fn metadata(&self) -> &BvhMetadata {
        &self.metadata
    }

    pub fn data(&self) -> &BvhData {
        &self.data
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl SceneGraph for BvhScene {
    fn root(&self) -> NodeId {
        0
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    fn name(&self, node: NodeId) -> &str {
        &self.nodes[node].name
    }

    /// Frames are clamped to the clip; a clip without motion samples the rest pose.
    fn world_position_at(&self, node: NodeId, frame: Frame) -> Position {
        let frame = frame_index(frame, self.metadata.num_frames);
        match self.nodes[node].source {
            NodeSource::SceneRoot => Position::zero(),
            NodeSource::Joint(joint) => self.data.global_position(joint, frame),
            NodeSource::EndSite(joint) => {
                let offset = self.metadata.joints[joint]
                    .endsite
                    .as_ref()
                    .map(|endsite| endsite.offset)
                    .unwrap_or_else(Position::zero);
                self.data.global_position(joint, frame)
                    + self.data.global_rotation(joint, frame).rotate_vector(offset)
            }
        }
    }

    fn animation_stacks(&self) -> Vec<AnimationStack> {
        if self.metadata.num_frames == 0 {
            return Vec::new();
        }
        vec![AnimationStack {
            name: self.take_name.clone(),
            span: FrameSpan::new(0, self.metadata.num_frames as Frame - 1),
        }]
    }

    fn close(&mut self) {
        self.data = BvhData::default();
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
        log::debug!("closed take '{}'", self.take_name);
    }
}

/// Loads `.bvh` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct BvhLoader;

impl SceneLoader for BvhLoader {
    fn extensions(&self) -> &[&str] {
        &["bvh"]
    }

    fn open(&self, path: &Path) -> Result<Box<dyn SceneGraph>, LoadError> {
        let (metadata, data) = load_bvh_from_file(path)?;
        let take_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Take 001")
            .to_string();
        log::debug!(
            "parsed {}: {} joints, {} frames at {} fps",
            path.display(),
            metadata.joints.len(),
            metadata.num_frames,
            metadata.fps
        );
        Ok(Box::new(BvhScene::new(take_name, metadata, data)))
    }
}
