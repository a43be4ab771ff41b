use crate::error::{LoadError, ParseError};
use crate::types::*;
use crate::utils;
use cgmath::{Rotation, Zero};
use regex::Regex;
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Trimmed, non-empty lines along with their 1-based line number.
struct LineReader<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        LineReader {
            lines: text.lines().enumerate(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (i, line) in self.lines.by_ref() {
            let line = line.trim();
            if !line.is_empty() {
                return Some((i + 1, line));
            }
        }
        None
    }
}

/// What an opening brace belongs to.
#[derive(Clone, Copy)]
enum Block {
    Joint(Index),
    EndSite(Index),
}

fn parse_floats(text: &str, line: usize) -> Result<Vec<f64>, ParseError> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Parse the HIERARCHY section up to (and including) the MOTION keyword.
/// Returns the joints and their rest offsets.
fn parse_hierarchy(reader: &mut LineReader) -> Result<(Vec<Joint>, Vec<Position>), ParseError> {
    let re_joint = Regex::new(r"^(ROOT|JOINT)\s+(.+)$").expect("valid regex");
    let re_offset = Regex::new(r"^OFFSET\s+(.+)$").expect("valid regex");
    let re_channels = Regex::new(r"^CHANNELS\s+(\d+)\s*(.*)$").expect("valid regex");

    let mut joints: Vec<Joint> = Vec::new();
    let mut offsets: Vec<Position> = Vec::new();
    let mut stack: Vec<Block> = Vec::new();
    let mut pending: Option<Block> = None;
    let mut channel_count: Index = 0;

    loop {
        let Some((line_no, line)) = reader.next_line() else {
            //// a file without MOTION is a valid static skeleton
            if !joints.is_empty() && stack.is_empty() {
                break;
            }
            return Err(ParseError::UnexpectedEof("HIERARCHY"));
        };

        if line.starts_with("HIERARCHY") {
            continue;
        } else if line.starts_with("MOTION") {
            if !stack.is_empty() || pending.is_some() {
                return Err(ParseError::UnbalancedBraces { line: line_no });
            }
            break;
        } else if let Some(captures) = re_joint.captures(line) {
            //// Create joint; its parent is the innermost joint block we are in
            let name = captures[2].trim().to_string();
            if name.is_empty() {
                return Err(ParseError::MissingJointName { line: line_no });
            }
            let parent_index = stack.iter().rev().find_map(|block| match block {
                Block::Joint(index) => Some(*index),
                Block::EndSite(_) => None,
            });
            if &captures[1] == "JOINT" && parent_index.is_none() {
                return Err(ParseError::OrphanStatement {
                    line: line_no,
                    token: "JOINT".to_string(),
                });
            }
            let index = joints.len();
            let depth = stack
                .iter()
                .filter(|block| matches!(block, Block::Joint(_)))
                .count();
            if let Some(parent) = parent_index {
                joints[parent].children.push(index);
            }
            joints.push(Joint {
                name,
                index,
                parent_index,
                depth,
                children: Vec::new(),
                channels: Vec::new(),
                channel_offset: channel_count,
                endsite: None,
            });
            offsets.push(Position::zero());
            pending = Some(Block::Joint(index));
        } else if line.to_lowercase().starts_with("end") {
            //// Create endsite
            match stack.last() {
                Some(Block::Joint(index)) => pending = Some(Block::EndSite(*index)),
                _ => {
                    return Err(ParseError::OrphanStatement {
                        line: line_no,
                        token: line.to_string(),
                    })
                }
            }
        } else if line == "{" {
            match pending.take() {
                Some(block) => stack.push(block),
                None => return Err(ParseError::UnbalancedBraces { line: line_no }),
            }
        } else if line == "}" {
            if stack.pop().is_none() {
                return Err(ParseError::UnbalancedBraces { line: line_no });
            }
        } else if let Some(captures) = re_offset.captures(line) {
            //// Parse offset
            let values = parse_floats(&captures[1], line_no)?;
            if values.len() != 3 {
                return Err(ParseError::InvalidOffset {
                    line: line_no,
                    count: values.len(),
                });
            }
            let offset = Position::new(values[0], values[1], values[2]);
            match stack.last() {
                Some(Block::Joint(index)) => offsets[*index] = offset,
                Some(Block::EndSite(index)) => joints[*index].endsite = Some(Endsite { offset }),
                None => {
                    return Err(ParseError::OrphanStatement {
                        line: line_no,
                        token: "OFFSET".to_string(),
                    })
                }
            }
        } else if let Some(captures) = re_channels.captures(line) {
            //// Parse channels
            let Some(Block::Joint(index)) = stack.last().copied() else {
                return Err(ParseError::OrphanStatement {
                    line: line_no,
                    token: "CHANNELS".to_string(),
                });
            };
            let channels = captures[2]
                .split_whitespace()
                .map(|name| {
                    Channel::from_name(name).ok_or_else(|| ParseError::UnknownChannel {
                        line: line_no,
                        channel: name.to_string(),
                    })
                })
                .collect::<Result<Vec<Channel>, ParseError>>()?;
            let joint = &mut joints[index];
            joint.channel_offset = channel_count;
            channel_count += channels.len();
            joint.channels = channels;
        } else {
            return Err(ParseError::Unexpected {
                line: line_no,
                token: line.to_string(),
            });
        }
    }

    if joints.is_empty() {
        return Err(ParseError::NoRoot);
    }
    Ok((joints, offsets))
}

/// Parse the MOTION section header and frame lines.
/// Returns (num_frames, frame_time, one row of channel values per frame).
fn parse_motion(
    reader: &mut LineReader,
    expected_channels: usize,
) -> Result<(usize, f64, Vec<Vec<f64>>), ParseError> {
    let re_frames = Regex::new(r"^Frames:\s*(\S+)$").expect("valid regex");
    let re_frame_time = Regex::new(r"^Frame Time:\s*(\S+)$").expect("valid regex");

    let Some((line_no, line)) = reader.next_line() else {
        //// hierarchy only
        return Ok((0, 0.0, Vec::new()));
    };
    let num_frames = match re_frames.captures(line) {
        Some(captures) => captures[1].parse::<usize>().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            token: captures[1].to_string(),
        })?,
        None => {
            return Err(ParseError::Unexpected {
                line: line_no,
                token: line.to_string(),
            })
        }
    };

    let (line_no, line) = reader
        .next_line()
        .ok_or(ParseError::UnexpectedEof("MOTION"))?;
    let frame_time = match re_frame_time.captures(line) {
        Some(captures) => captures[1].parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            token: captures[1].to_string(),
        })?,
        None => {
            return Err(ParseError::Unexpected {
                line: line_no,
                token: line.to_string(),
            })
        }
    };

    //// grow as lines arrive, the header count is untrusted
    let mut motion = Vec::new();
    while motion.len() < num_frames {
        let (line_no, line) = reader
            .next_line()
            .ok_or(ParseError::UnexpectedEof("MOTION"))?;
        let values = parse_floats(line, line_no)?;
        if values.len() != expected_channels {
            return Err(ParseError::FrameLength {
                line: line_no,
                expected: expected_channels,
                actual: values.len(),
            });
        }
        motion.push(values);
    }
    if reader.next_line().is_some() {
        log::debug!("ignoring motion lines past the declared {num_frames} frames");
    }

    Ok((num_frames, frame_time, motion))
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Rest pose: offsets accumulated down the hierarchy.
fn calc_rest_pose(metadata: &BvhMetadata, data: &mut BvhData) {
    for joint in metadata.joints.iter() {
        data.rest_global_positions[joint.index] = match joint.parent_index {
            Some(parent) => data.rest_global_positions[parent] + data.rest_local_positions[joint.index],
            None => data.rest_local_positions[joint.index],
        };
    }
}

/// Local channel values to local transforms, then forward kinematics.
/// Joints are in pre-order so parents are always resolved first.
fn calc_pose(metadata: &BvhMetadata, data: &mut BvhData, motion: &[Vec<f64>]) {
    for joint in metadata.joints.iter() {
        let i = joint.index;
        let columns = joint.channel_offset..joint.channel_offset + joint.channels.len();
        for (frame, values) in motion.iter().enumerate() {
            let values = &values[columns.clone()];
            let local_position =
                utils::translation_from_channels(data.rest_local_positions[i], &joint.channels, values);
            let local_rotation = utils::rotation_from_channels(&joint.channels, values);

            let (global_position, global_rotation) = match joint.parent_index {
                Some(parent) => {
                    let parent_position = data.pose_global_positions[parent][frame];
                    let parent_rotation = data.pose_global_rotations[parent][frame];
                    (
                        parent_position + parent_rotation.rotate_vector(local_position),
                        parent_rotation * local_rotation,
                    )
                }
                None => (local_position, local_rotation),
            };

            data.pose_local_positions[i].push(local_position);
            data.pose_local_rotations[i].push(local_rotation);
            data.pose_global_positions[i].push(global_position);
            data.pose_global_rotations[i].push(global_rotation);
        }
    }
}

fn parse_bvh(text: &str) -> Result<(BvhMetadata, BvhData), ParseError> {
    let mut reader = LineReader::new(text);

    let (joints, rest_local_positions) = parse_hierarchy(&mut reader)?;
    let expected_channels = joints.iter().map(|joint| joint.channels.len()).sum();
    let (num_frames, frame_time, motion) = parse_motion(&mut reader, expected_channels)?;

    let fps = if frame_time > 0.0 {
        (1.0 / frame_time).round() as u32
    } else {
        0
    };

    let num_joints = joints.len();
    let metadata = BvhMetadata {
        joints,
        num_frames,
        frame_time,
        fps,
    };

    let mut data = BvhData {
        rest_local_positions,
        rest_global_positions: vec![Position::zero(); num_joints],
        pose_local_positions: vec![Vec::with_capacity(motion.len()); num_joints],
        pose_local_rotations: vec![Vec::with_capacity(motion.len()); num_joints],
        pose_global_positions: vec![Vec::with_capacity(motion.len()); num_joints],
        pose_global_rotations: vec![Vec::with_capacity(motion.len()); num_joints],
    };

    calc_rest_pose(&metadata, &mut data);
    calc_pose(&metadata, &mut data, &motion);

    Ok((metadata, data))
}

//////////////////////////////////////////////////////////////// PUBLIC ///////////////////////////////////////////////////////////////////////////////////

/// load a bvh file from a file path
pub fn load_bvh_from_file(file_path: impl AsRef<Path>) -> Result<(BvhMetadata, BvhData), LoadError> {
    let path = file_path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::ParseFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_bvh(&contents).map_err(|e| e.into_load_error(path))
}

/// load a bvh file from a string
pub fn load_bvh_from_string(bvh_string: &str) -> Result<(BvhMetadata, BvhData), ParseError> {
    parse_bvh(bvh_string)
}
