//! Participants: the local one (imperative surface) and remote ones
//! (roster data).

use crate::backend::BackendSession;
use crate::error::{Result, RoomError};
use crate::permissions::SubscriptionPermissions;
use crate::publication::{LocalTrackPublication, RemoteTrackPublication};
use crate::track::{LocalAudioTrack, LocalVideoTrack, TrackKind, TrackSid, TrackSource};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Stable identity of a participant within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantIdentity(String);

impl ParticipantIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Roster entry for a remote participant. Snapshots are plain data and
/// cheap to clone; the room keeps the authoritative copy current.
#[derive(Debug, Clone)]
pub struct RemoteParticipant {
    pub identity: ParticipantIdentity,
    pub name: String,
    pub publications: Vec<RemoteTrackPublication>,
}

impl RemoteParticipant {
    /// Finds a publication by sid.
    pub fn publication(&self, sid: &TrackSid) -> Option<&RemoteTrackPublication> {
        self.publications.iter().find(|p| &p.sid == sid)
    }
}

/// The local participant: the handle through which this client publishes
/// media and controls who may subscribe to it.
pub struct LocalParticipant {
    identity: ParticipantIdentity,
    name: String,
    session: Arc<dyn BackendSession>,
    camera: Mutex<Option<Arc<LocalVideoTrack>>>,
    camera_publication: Mutex<Option<LocalTrackPublication>>,
    microphone: Mutex<Option<Arc<LocalAudioTrack>>>,
    microphone_publication: Mutex<Option<LocalTrackPublication>>,
}

impl LocalParticipant {
    pub(crate) fn new(
        identity: ParticipantIdentity,
        name: String,
        session: Arc<dyn BackendSession>,
    ) -> Self {
        Self {
            identity,
            name,
            session,
            camera: Mutex::new(None),
            camera_publication: Mutex::new(None),
            microphone: Mutex::new(None),
            microphone_publication: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> &ParticipantIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the subscription permissions over this participant's
    /// tracks.
    pub fn set_subscription_permissions(
        &self,
        permissions: SubscriptionPermissions,
    ) -> Result<()> {
        self.session.set_subscription_permissions(permissions)
    }

    /// Publishes the camera and microphone tracks, starting capture.
    ///
    /// Already-published tracks are re-enabled rather than re-published,
    /// so the call is safe to repeat.
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot open a video source or rejects a
    /// publication.
    pub fn enable_camera_and_microphone(&self) -> Result<()> {
        {
            let mut camera = self.camera.lock().map_err(|_| RoomError::LockPoisoned)?;
            match camera.as_ref() {
                Some(track) => track.set_enabled(true),
                None => {
                    // Publish before starting capture: a rejected
                    // publication must not leave a capture thread behind.
                    let source = self.session.open_video_source()?;
                    let sid = self
                        .session
                        .publish_track(TrackKind::Video, TrackSource::Camera)?;
                    self.store_camera_publication(sid)?;
                    *camera = Some(Arc::new(LocalVideoTrack::start(source)));
                }
            }
        }

        {
            let mut microphone = self
                .microphone
                .lock()
                .map_err(|_| RoomError::LockPoisoned)?;
            match microphone.as_ref() {
                Some(track) => track.set_muted(false),
                None => {
                    let track = Arc::new(LocalAudioTrack::new());
                    let sid = self
                        .session
                        .publish_track(TrackKind::Audio, TrackSource::Microphone)?;
                    self.store_microphone_publication(sid)?;
                    *microphone = Some(track);
                }
            }
        }

        Ok(())
    }

    fn store_camera_publication(&self, sid: TrackSid) -> Result<()> {
        let mut publication = self
            .camera_publication
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        *publication = Some(LocalTrackPublication {
            sid,
            kind: TrackKind::Video,
            source: TrackSource::Camera,
        });
        Ok(())
    }

    fn store_microphone_publication(&self, sid: TrackSid) -> Result<()> {
        let mut publication = self
            .microphone_publication
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        *publication = Some(LocalTrackPublication {
            sid,
            kind: TrackKind::Audio,
            source: TrackSource::Microphone,
        });
        Ok(())
    }

    /// The camera track, once enabled.
    pub fn camera_track(&self) -> Option<Arc<LocalVideoTrack>> {
        self.camera.lock().ok().and_then(|guard| guard.clone())
    }

    /// The microphone track, once enabled.
    pub fn microphone_track(&self) -> Option<Arc<LocalAudioTrack>> {
        self.microphone.lock().ok().and_then(|guard| guard.clone())
    }

    /// The camera publication record, once published.
    pub fn camera_publication(&self) -> Option<LocalTrackPublication> {
        self.camera_publication
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Stops local capture. Called on disconnect.
    pub(crate) fn stop_tracks(&self) {
        if let Ok(camera) = self.camera.lock()
            && let Some(track) = camera.as_ref()
        {
            track.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_round_trip() {
        let identity = ParticipantIdentity::from("mediator");
        assert_eq!(identity.as_str(), "mediator");
        assert_eq!(identity.to_string(), "mediator");
        assert_eq!(identity, ParticipantIdentity::from("mediator".to_string()));
    }

    #[test]
    fn test_remote_participant_publication_lookup() {
        let participant = RemoteParticipant {
            identity: ParticipantIdentity::from("guest"),
            name: "Guest".to_string(),
            publications: vec![RemoteTrackPublication {
                sid: TrackSid::from("TR_abc"),
                kind: TrackKind::Audio,
                source: TrackSource::Microphone,
                subscribed: false,
            }],
        };
        assert!(participant.publication(&TrackSid::from("TR_abc")).is_some());
        assert!(participant.publication(&TrackSid::from("TR_xyz")).is_none());
    }
}
