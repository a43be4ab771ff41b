//! Browse folders of motion-capture files, sample their skeletons frame by
//! frame and drive playback over several clips at once.
//!
//! File formats sit behind [`provider::SceneLoader`]; `.bvh` support ships in
//! [`bvh_scene`]. The `visualize` feature adds a bevy viewport.

pub mod aggregator;
pub mod browse;
pub mod bvh_scene;
pub mod color;
pub mod config;
pub mod error;
pub mod parse;
pub mod playback;
pub mod provider;
pub mod sampler;
pub mod scene;
pub mod signal;
pub mod types;
mod utils;

#[cfg(feature = "visualize")]
pub mod visualize;

pub use aggregator::{LoadReport, SceneAggregator, SceneHierarchyDescription};
pub use bvh_scene::{BvhLoader, BvhScene};
pub use color::Color;
pub use config::BrowserConfig;
pub use error::{ConfigError, LoadError, ParseError};
pub use playback::{PlayState, PlaybackClock, PlaybackController, PlaybackState};
pub use provider::{AnimationStack, FrameSpan, NodeId, SceneGraph, SceneLoader};
pub use sampler::{sample, sample_scenes, BoneSegment};
pub use scene::{LoadState, NodeHierarchy, SceneHandle};
