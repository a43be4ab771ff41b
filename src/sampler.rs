//! Turns a scene at a given frame into world-space bone segments.

use std::collections::HashSet;

use crate::color::Color;
use crate::provider::{NodeId, SceneGraph};
use crate::scene::SceneHandle;
use crate::types::{Frame, Position};

/// One skeletal link at one frame, ready to be drawn as a line.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneSegment {
    pub name: String,
    pub position: Position,
    pub parent_position: Position,
    pub color: Color,
}

/// Sample every non-root node of `scene` at `frame`, depth-first pre-order.
///
/// Nodes named in `hidden_node_names` emit no segment, but their descendants
/// are still visited. The frame is passed to the provider as is.
pub fn sample(scene: &SceneHandle, frame: Frame, hidden_node_names: &HashSet<String>) -> Vec<BoneSegment> {
    let Some(graph) = scene.graph() else {
        return Vec::new();
    };
    let color = scene.display_color();
    let mut segments = Vec::new();

    let root = graph.root();
    let root_position = graph.world_position_at(root, frame);
    let mut stack: Vec<(NodeId, Position)> = children_of(graph, root, root_position);

    while let Some((node, parent_position)) = stack.pop() {
        let position = graph.world_position_at(node, frame);
        let name = graph.name(node);
        if !hidden_node_names.contains(name) {
            segments.push(BoneSegment {
                name: name.to_string(),
                position,
                parent_position,
                color,
            });
        }
        stack.extend(children_of(graph, node, position));
    }
    segments
}

/// Children of `node` paired with `position`, reversed so popping visits them in order.
fn children_of(graph: &dyn SceneGraph, node: NodeId, position: Position) -> Vec<(NodeId, Position)> {
    graph
        .children(node)
        .iter()
        .rev()
        .map(|&child| (child, position))
        .collect()
}

/// Segments of every scene at `frame`, each filtered by its own hidden set.
pub fn sample_scenes<'a>(scenes: impl IntoIterator<Item = &'a SceneHandle>, frame: Frame) -> Vec<BoneSegment> {
    scenes
        .into_iter()
        .filter(|scene| scene.is_loaded())
        .flat_map(|scene| sample(scene, frame, scene.hidden_nodes()))
        .collect()
}
