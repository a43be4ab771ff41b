use cgmath::{Quaternion as CgQuaternion, Vector3};

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
pub type Quaternion = CgQuaternion<f64>;
pub type Position = Vector3<f64>;
pub type Depth = usize;
/// Integer frame number, provider-defined granularity.
pub type Frame = i64;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// One of the six channels a .bvh joint may animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    pub fn from_name(name: &str) -> Option<Channel> {
        match name {
            "Xposition" => Some(Channel::Xposition),
            "Yposition" => Some(Channel::Yposition),
            "Zposition" => Some(Channel::Zposition),
            "Xrotation" => Some(Channel::Xrotation),
            "Yrotation" => Some(Channel::Yrotation),
            "Zrotation" => Some(Channel::Zrotation),
            _ => None,
        }
    }

    pub fn is_position(&self) -> bool {
        matches!(
            self,
            Channel::Xposition | Channel::Yposition | Channel::Zposition
        )
    }
}

#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub index: Index,
    /// `None` for the ROOT joint.
    pub parent_index: Option<Index>,
    pub depth: Depth,
    pub children: Vec<Index>,
    pub channels: Vec<Channel>,
    /// Column of this joint's first channel in a motion line.
    pub channel_offset: Index,
    pub endsite: Option<Endsite>,
}

impl Joint {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Endsite {
    pub offset: Position,
}

#[derive(Debug, Clone)]
pub struct BvhMetadata {
    /// Joints in file order, which is depth-first pre-order.
    pub joints: Vec<Joint>,
    pub num_frames: usize,
    pub frame_time: f64,
    pub fps: u32,
}

impl BvhMetadata {
    pub fn find_joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.name == name)
    }

    pub fn find_joint_by_index(&self, index: Index) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Total number of floats expected on every motion line.
    pub fn channel_count(&self) -> usize {
        self.joints.iter().map(|joint| joint.channels.len()).sum()
    }
}

/// Per-joint pose data. Outer index is the joint, inner index the frame.
#[derive(Debug, Clone, Default)]
pub struct BvhData {
    pub rest_local_positions: Vec<Position>,
    pub rest_global_positions: Vec<Position>,

    pub pose_local_positions: Vec<Vec<Position>>,
    pub pose_local_rotations: Vec<Vec<Quaternion>>,
    pub pose_global_positions: Vec<Vec<Position>>,
    pub pose_global_rotations: Vec<Vec<Quaternion>>,
}

impl BvhData {
    /// Global position of `joint` at `frame`, falling back to the rest pose
    /// when the file has no motion.
    pub fn global_position(&self, joint: Index, frame: usize) -> Position {
        match self.pose_global_positions[joint].get(frame) {
            Some(position) => *position,
            None => self.rest_global_positions[joint],
        }
    }

    /// Global rotation of `joint` at `frame`, identity without motion.
    pub fn global_rotation(&self, joint: Index, frame: usize) -> Quaternion {
        use cgmath::One;
        match self.pose_global_rotations[joint].get(frame) {
            Some(rotation) => *rotation,
            None => Quaternion::one(),
        }
    }
}
