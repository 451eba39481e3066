//! The seam between the room API and whatever moves the media.
//!
//! A [`RoomBackend`] turns a connect call into a [`BackendConnection`]:
//! a session handle for imperative calls, a roster snapshot, and a channel
//! of events for everything that happens afterwards. The bundled
//! [`LocalRoomService`](crate::LocalRoomService) implements it in-process;
//! a production media engine would implement it over its own signaling.

use crate::error::Result;
use crate::frame::VideoSource;
use crate::options::{ConnectOptions, RoomOptions};
use crate::participant::ParticipantIdentity;
use crate::permissions::SubscriptionPermissions;
use crate::track::{TrackKind, TrackSid, TrackSource};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A published track as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationInfo {
    pub sid: TrackSid,
    pub kind: TrackKind,
    pub source: TrackSource,
}

/// A participant as the backend reports it.
#[derive(Debug, Clone)]
pub struct ParticipantSnapshot {
    pub identity: ParticipantIdentity,
    pub name: String,
    pub publications: Vec<PublicationInfo>,
}

/// Asynchronous room changes pushed by the backend after connect.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    ParticipantJoined(ParticipantSnapshot),
    ParticipantLeft(ParticipantIdentity),
    TrackPublished {
        participant: ParticipantIdentity,
        publication: PublicationInfo,
    },
    TrackUnpublished {
        participant: ParticipantIdentity,
        sid: TrackSid,
    },
}

/// Everything the room passes down at connect time.
pub struct ConnectContext<'a> {
    pub options: &'a RoomOptions,
    pub connect: ConnectOptions,
    pub e2ee_enabled: bool,
    pub key_installed: bool,
}

/// Result of a successful connect.
pub struct BackendConnection {
    pub session: Arc<dyn BackendSession>,
    pub room_name: String,
    pub local_identity: ParticipantIdentity,
    pub local_name: String,
    /// Participants already in the room, with their publications.
    pub participants: Vec<ParticipantSnapshot>,
    /// Closed by the backend when the session ends.
    pub events: Receiver<BackendEvent>,
}

/// Connects clients to rooms.
pub trait RoomBackend: Send + Sync {
    /// Joins the room addressed by `url` as the participant encoded in
    /// `token`.
    ///
    /// # Errors
    ///
    /// Implementations reject malformed urls/tokens and duplicate
    /// identities.
    fn connect(&self, url: &str, token: &str, ctx: ConnectContext<'_>) -> Result<BackendConnection>;
}

/// Per-connection operations. All methods may be called from any thread.
pub trait BackendSession: Send + Sync {
    /// Replaces the subscription permissions over the local tracks.
    fn set_subscription_permissions(&self, permissions: SubscriptionPermissions) -> Result<()>;

    /// Requests or drops a subscription to a remote publication.
    ///
    /// Returns the resulting subscription state: `Ok(false)` on a request
    /// the publisher's permissions deny.
    fn set_subscribed(&self, sid: &TrackSid, subscribed: bool) -> Result<bool>;

    /// Announces a local track publication; returns its assigned sid.
    fn publish_track(&self, kind: TrackKind, source: TrackSource) -> Result<TrackSid>;

    /// Opens the capture source for the local camera track.
    fn open_video_source(&self) -> Result<Box<dyn VideoSource>>;

    /// Leaves the room. Idempotent; the event channel closes afterwards.
    fn disconnect(&self);
}
