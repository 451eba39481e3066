//! Publication records: what a participant has published to the room.

use crate::track::{TrackKind, TrackSid, TrackSource};

/// A remote participant's published track as seen from this client.
///
/// Plain data; subscribing happens through
/// [`Room::set_subscribed`](crate::Room::set_subscribed) and the
/// `subscribed` field mirrors the last granted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrackPublication {
    pub sid: TrackSid,
    pub kind: TrackKind,
    pub source: TrackSource,
    pub subscribed: bool,
}

/// A track this client has published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTrackPublication {
    pub sid: TrackSid,
    pub kind: TrackKind,
    pub source: TrackSource,
}
