//! Room connection configuration.
//!
//! Options are assembled once per session attempt and handed to
//! [`Room::new`](crate::Room::new); a changed configuration means a new
//! `Room`, never an in-place mutation.

use crate::codec::VideoCodec;
use crate::e2ee::E2eeOptions;
use crate::presets::{self, VideoPreset};

/// How densely adaptive streaming samples the rendered element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelDensity {
    /// Match the physical screen density.
    Screen,
    /// Fixed multiplier over the logical size.
    Factor(f32),
}

/// Adaptive streaming: resolution follows the size the video is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveStreamOptions {
    pub pixel_density: PixelDensity,
}

impl Default for AdaptiveStreamOptions {
    fn default() -> Self {
        Self {
            pixel_density: PixelDensity::Screen,
        }
    }
}

/// Defaults applied to every track published by the local participant.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishDefaults {
    /// Simulcast layers offered for camera video, highest first.
    pub simulcast_layers: Vec<VideoPreset>,
    /// Redundant audio encoding. Must be off when E2EE is active.
    pub red: bool,
    pub video_codec: VideoCodec,
}

impl Default for PublishDefaults {
    fn default() -> Self {
        Self {
            simulcast_layers: vec![presets::H540, presets::H216],
            red: true,
            video_codec: VideoCodec::default(),
        }
    }
}

/// Complete per-session configuration.
#[derive(Clone)]
pub struct RoomOptions {
    pub publish_defaults: PublishDefaults,
    pub adaptive_stream: Option<AdaptiveStreamOptions>,
    /// Pause simulcast layers nobody subscribes to.
    pub dynacast: bool,
    /// End-to-end encryption setup; `None` runs the session unencrypted.
    pub e2ee: Option<E2eeOptions>,
    /// Bundle all media over a single peer connection (staging deployments).
    pub single_peer_connection: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            publish_defaults: PublishDefaults::default(),
            adaptive_stream: Some(AdaptiveStreamOptions::default()),
            dynacast: true,
            e2ee: None,
            single_peer_connection: false,
        }
    }
}

/// Options for the connect call itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectOptions {
    /// Subscribe to every remote track as it appears. Clients that manage
    /// subscriptions themselves connect with this off.
    pub auto_subscribe: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            auto_subscribe: true,
        }
    }
}
