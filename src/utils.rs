use crate::types::{Channel, Frame, Position, Quaternion};
use cgmath::{Deg, One, Rotation3, Vector3};

/// Compose the local rotation of a joint from its channel values (in DEGREES).
/// Rotations are applied in the order the channels are listed, so
/// `Zrotation Xrotation Yrotation` yields `Rz * Rx * Ry`.
pub(crate) fn rotation_from_channels(channels: &[Channel], values: &[f64]) -> Quaternion {
    channels
        .iter()
        .zip(values)
        .fold(Quaternion::one(), |acc, (channel, &value)| {
            let axis = match channel {
                Channel::Xrotation => Vector3::unit_x(),
                Channel::Yrotation => Vector3::unit_y(),
                Channel::Zrotation => Vector3::unit_z(),
                _ => return acc,
            };
            acc * Quaternion::from_axis_angle(axis, Deg(value))
        })
}

/// Local translation of a joint: the rest offset, with any position channel
/// overriding the matching component.
pub(crate) fn translation_from_channels(
    offset: Position,
    channels: &[Channel],
    values: &[f64],
) -> Position {
    let mut translation = offset;
    for (channel, &value) in channels.iter().zip(values) {
        match channel {
            Channel::Xposition => translation.x = value,
            Channel::Yposition => translation.y = value,
            Channel::Zposition => translation.z = value,
            _ => {}
        }
    }
    translation
}

/// Clamp a frame into `[0, num_frames - 1]` and turn it into an index.
pub(crate) fn frame_index(frame: Frame, num_frames: usize) -> usize {
    if num_frames == 0 || frame <= 0 {
        return 0;
    }
    (frame as usize).min(num_frames - 1)
}
