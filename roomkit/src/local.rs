//! In-process room hub implementing the backend seam.
//!
//! `LocalRoomService` keeps rooms, participants, publications and
//! subscription state in memory and pushes changes to connected clients
//! over channels. It moves no media; it exists so the client, the demos
//! and the test suite have a backend with observable behavior. It also
//! hosts *scripted* participants: roster entries without a client behind
//! them, useful for seeding an agent into a room.

use crate::backend::{
    BackendConnection, BackendEvent, BackendSession, ConnectContext, ParticipantSnapshot,
    PublicationInfo, RoomBackend,
};
use crate::codec::VideoCodec;
use crate::error::{Result, RoomError};
use crate::frame::{TestPatternSource, VideoSource};
use crate::participant::ParticipantIdentity;
use crate::permissions::SubscriptionPermissions;
use crate::presets::VideoPreset;
use crate::track::{TrackKind, TrackSid, TrackSource};
use logging::Logger;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};

/// What a client sent at connect time. Recorded per room for inspection.
#[derive(Debug, Clone)]
pub struct ConnectRecord {
    pub identity: ParticipantIdentity,
    pub auto_subscribe: bool,
    pub e2ee_enabled: bool,
    pub key_installed: bool,
    pub video_codec: VideoCodec,
    pub dynacast: bool,
    pub simulcast_layers: Vec<VideoPreset>,
    pub single_peer_connection: bool,
}

/// Subscription bookkeeping of one publication.
#[derive(Debug, Clone, Default)]
pub struct PublicationStats {
    pub subscribe_requests: u32,
    pub unsubscribe_requests: u32,
    pub subscribers: Vec<ParticipantIdentity>,
}

struct PublicationRecord {
    info: PublicationInfo,
    subscribe_requests: u32,
    unsubscribe_requests: u32,
    subscribers: HashSet<ParticipantIdentity>,
}

impl PublicationRecord {
    fn new(info: PublicationInfo) -> Self {
        Self {
            info,
            subscribe_requests: 0,
            unsubscribe_requests: 0,
            subscribers: HashSet::new(),
        }
    }
}

struct ParticipantRecord {
    name: String,
    permissions: SubscriptionPermissions,
    publications: Vec<PublicationRecord>,
    /// `None` for scripted participants, which receive no events.
    event_tx: Option<Sender<BackendEvent>>,
}

#[derive(Default)]
struct RoomRecord {
    participants: HashMap<ParticipantIdentity, ParticipantRecord>,
    connects: Vec<ConnectRecord>,
}

#[derive(Default)]
struct ServiceInner {
    rooms: HashMap<String, RoomRecord>,
}

/// The in-process backend. Cloning shares the same hub.
#[derive(Clone)]
pub struct LocalRoomService {
    inner: Arc<Mutex<ServiceInner>>,
    logger: Option<Logger>,
}

impl LocalRoomService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ServiceInner::default())),
            logger: None,
        }
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ServiceInner::default())),
            logger: Some(logger),
        }
    }

    /// Adds a participant without a client behind it, publishing the given
    /// tracks. Connected clients see the join and one publication event
    /// per track; clients connecting later get it all in their roster
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Fails when the identity is already present in the room.
    pub fn add_scripted_participant(
        &self,
        room: &str,
        identity: impl Into<ParticipantIdentity>,
        name: &str,
        tracks: &[(TrackKind, TrackSource)],
    ) -> Result<Vec<TrackSid>> {
        let identity = identity.into();
        let mut inner = self.inner.lock().map_err(|_| RoomError::LockPoisoned)?;
        let room_record = inner.rooms.entry(room.to_string()).or_default();
        if room_record.participants.contains_key(&identity) {
            return Err(RoomError::Backend(format!(
                "identity '{}' already in room '{}'",
                identity, room
            )));
        }

        room_record.participants.insert(
            identity.clone(),
            ParticipantRecord {
                name: name.to_string(),
                permissions: SubscriptionPermissions::allow_all(),
                publications: Vec::new(),
                event_tx: None,
            },
        );
        broadcast(
            room_record,
            &identity,
            BackendEvent::ParticipantJoined(ParticipantSnapshot {
                identity: identity.clone(),
                name: name.to_string(),
                publications: Vec::new(),
            }),
        );

        let mut sids = Vec::with_capacity(tracks.len());
        for &(kind, source) in tracks {
            sids.push(publish_into(room_record, &identity, kind, source)?);
        }

        self.log(&format!(
            "[ROOM] Scripted participant '{}' joined '{}' with {} track(s)",
            identity,
            room,
            sids.len()
        ));
        Ok(sids)
    }

    /// Publishes one more track for an existing scripted participant,
    /// firing the publication event at connected clients.
    ///
    /// # Errors
    ///
    /// Fails when the participant is not in the room.
    pub fn publish_scripted_track(
        &self,
        room: &str,
        identity: impl Into<ParticipantIdentity>,
        kind: TrackKind,
        source: TrackSource,
    ) -> Result<TrackSid> {
        let identity = identity.into();
        let mut inner = self.inner.lock().map_err(|_| RoomError::LockPoisoned)?;
        let room_record = inner
            .rooms
            .get_mut(room)
            .ok_or_else(|| RoomError::Backend(format!("no room '{}'", room)))?;
        if !room_record.participants.contains_key(&identity) {
            return Err(RoomError::Backend(format!(
                "no participant '{}' in room '{}'",
                identity, room
            )));
        }
        publish_into(room_record, &identity, kind, source)
    }

    /// Removes a participant (scripted or connected), notifying the rest
    /// of the room. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Only on internal lock poisoning.
    pub fn remove_participant(
        &self,
        room: &str,
        identity: impl Into<ParticipantIdentity>,
    ) -> Result<bool> {
        let identity = identity.into();
        let mut inner = self.inner.lock().map_err(|_| RoomError::LockPoisoned)?;
        let Some(room_record) = inner.rooms.get_mut(room) else {
            return Ok(false);
        };
        let removed = room_record.participants.remove(&identity).is_some();
        if removed {
            forget_subscriber(room_record, &identity);
            broadcast(
                room_record,
                &identity,
                BackendEvent::ParticipantLeft(identity.clone()),
            );
            self.log(&format!("[ROOM] Participant '{}' left '{}'", identity, room));
        }
        Ok(removed)
    }

    /// Connect parameters seen for a room, in arrival order.
    pub fn connect_records(&self, room: &str) -> Vec<ConnectRecord> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.rooms.get(room).map(|r| r.connects.clone()))
            .unwrap_or_default()
    }

    /// Subscription bookkeeping for one publication.
    pub fn publication_stats(&self, room: &str, sid: &TrackSid) -> Option<PublicationStats> {
        let inner = self.inner.lock().ok()?;
        let room_record = inner.rooms.get(room)?;
        room_record
            .participants
            .values()
            .flat_map(|p| p.publications.iter())
            .find(|record| &record.info.sid == sid)
            .map(|record| PublicationStats {
                subscribe_requests: record.subscribe_requests,
                unsubscribe_requests: record.unsubscribe_requests,
                subscribers: record.subscribers.iter().cloned().collect(),
            })
    }

    /// Participants currently in the room, scripted ones included.
    pub fn participant_count(&self, room: &str) -> usize {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.rooms.get(room).map(|r| r.participants.len()))
            .unwrap_or(0)
    }

    fn log(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }

    fn log_warn(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.warn(message);
        }
    }
}

impl Default for LocalRoomService {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomBackend for LocalRoomService {
    fn connect(&self, url: &str, token: &str, ctx: ConnectContext<'_>) -> Result<BackendConnection> {
        let room_name = parse_local_url(url)?;
        let (identity, display_name) = parse_token(token)?;

        let mut inner = self.inner.lock().map_err(|_| RoomError::LockPoisoned)?;
        let room_record = inner.rooms.entry(room_name.clone()).or_default();
        if room_record.participants.contains_key(&identity) {
            return Err(RoomError::Backend(format!(
                "identity '{}' already in room '{}'",
                identity, room_name
            )));
        }

        room_record.connects.push(ConnectRecord {
            identity: identity.clone(),
            auto_subscribe: ctx.connect.auto_subscribe,
            e2ee_enabled: ctx.e2ee_enabled,
            key_installed: ctx.key_installed,
            video_codec: ctx.options.publish_defaults.video_codec,
            dynacast: ctx.options.dynacast,
            simulcast_layers: ctx.options.publish_defaults.simulcast_layers.clone(),
            single_peer_connection: ctx.options.single_peer_connection,
        });

        let participants: Vec<ParticipantSnapshot> = room_record
            .participants
            .iter()
            .map(|(id, record)| snapshot_of(id, record))
            .collect();

        broadcast(
            room_record,
            &identity,
            BackendEvent::ParticipantJoined(ParticipantSnapshot {
                identity: identity.clone(),
                name: display_name.clone(),
                publications: Vec::new(),
            }),
        );

        let (event_tx, events) = channel();
        room_record.participants.insert(
            identity.clone(),
            ParticipantRecord {
                name: display_name.clone(),
                permissions: SubscriptionPermissions::default(),
                publications: Vec::new(),
                event_tx: Some(event_tx),
            },
        );

        self.log(&format!(
            "[ROOM] '{}' connected to '{}' (auto_subscribe: {}, e2ee: {})",
            identity, room_name, ctx.connect.auto_subscribe, ctx.e2ee_enabled
        ));

        Ok(BackendConnection {
            session: Arc::new(LocalSession {
                service: self.clone(),
                room: room_name.clone(),
                identity: identity.clone(),
            }),
            room_name,
            local_identity: identity,
            local_name: display_name,
            participants,
            events,
        })
    }
}

/// Session handle produced by [`LocalRoomService::connect`].
struct LocalSession {
    service: LocalRoomService,
    room: String,
    identity: ParticipantIdentity,
}

impl BackendSession for LocalSession {
    fn set_subscription_permissions(&self, permissions: SubscriptionPermissions) -> Result<()> {
        let mut inner = self
            .service
            .inner
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        let participant = inner
            .rooms
            .get_mut(&self.room)
            .and_then(|room| room.participants.get_mut(&self.identity))
            .ok_or(RoomError::NotConnected)?;
        participant.permissions = permissions;
        self.service.log(&format!(
            "[TRACK] '{}' updated subscription permissions",
            self.identity
        ));
        Ok(())
    }

    fn set_subscribed(&self, sid: &TrackSid, subscribed: bool) -> Result<bool> {
        let mut inner = self
            .service
            .inner
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        let room = inner.rooms.get_mut(&self.room).ok_or(RoomError::NotConnected)?;
        if !room.participants.contains_key(&self.identity) {
            return Err(RoomError::NotConnected);
        }

        let owner_identity = room
            .participants
            .iter()
            .find(|(_, record)| record.publications.iter().any(|p| &p.info.sid == sid))
            .map(|(id, _)| id.clone())
            .ok_or_else(|| RoomError::UnknownTrack(sid.to_string()))?;
        let owner = room
            .participants
            .get_mut(&owner_identity)
            .ok_or_else(|| RoomError::UnknownTrack(sid.to_string()))?;
        let kind = owner
            .publications
            .iter()
            .find(|p| &p.info.sid == sid)
            .map(|p| p.info.kind)
            .ok_or_else(|| RoomError::UnknownTrack(sid.to_string()))?;
        let allowed = owner.permissions.allows(&self.identity, kind);
        let record = owner
            .publications
            .iter_mut()
            .find(|p| &p.info.sid == sid)
            .ok_or_else(|| RoomError::UnknownTrack(sid.to_string()))?;

        if subscribed {
            record.subscribe_requests += 1;
            if allowed {
                record.subscribers.insert(self.identity.clone());
            } else {
                self.service.log_warn(&format!(
                    "[TRACK] Subscription to {} by '{}' denied by publisher permissions",
                    sid, self.identity
                ));
            }
            Ok(allowed)
        } else {
            record.unsubscribe_requests += 1;
            record.subscribers.remove(&self.identity);
            Ok(false)
        }
    }

    fn publish_track(&self, kind: TrackKind, source: TrackSource) -> Result<TrackSid> {
        let mut inner = self
            .service
            .inner
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        let room = inner.rooms.get_mut(&self.room).ok_or(RoomError::NotConnected)?;
        if !room.participants.contains_key(&self.identity) {
            return Err(RoomError::NotConnected);
        }
        let sid = publish_into(room, &self.identity, kind, source)?;
        self.service.log(&format!(
            "[TRACK] '{}' published {} track {}",
            self.identity,
            kind.as_str(),
            sid
        ));
        Ok(sid)
    }

    fn open_video_source(&self) -> Result<Box<dyn VideoSource>> {
        Ok(Box::new(TestPatternSource::default()))
    }

    fn disconnect(&self) {
        let Ok(mut inner) = self.service.inner.lock() else {
            return;
        };
        let Some(room) = inner.rooms.get_mut(&self.room) else {
            return;
        };
        if room.participants.remove(&self.identity).is_some() {
            forget_subscriber(room, &self.identity);
            broadcast(
                room,
                &self.identity,
                BackendEvent::ParticipantLeft(self.identity.clone()),
            );
            self.service.log(&format!(
                "[ROOM] '{}' disconnected from '{}'",
                self.identity, self.room
            ));
        }
    }
}

fn snapshot_of(identity: &ParticipantIdentity, record: &ParticipantRecord) -> ParticipantSnapshot {
    ParticipantSnapshot {
        identity: identity.clone(),
        name: record.name.clone(),
        publications: record.publications.iter().map(|p| p.info.clone()).collect(),
    }
}

fn broadcast(room: &RoomRecord, skip: &ParticipantIdentity, event: BackendEvent) {
    for (identity, record) in &room.participants {
        if identity == skip {
            continue;
        }
        if let Some(tx) = &record.event_tx {
            let _ = tx.send(event.clone());
        }
    }
}

/// Adds a publication and announces it to everyone else in the room.
fn publish_into(
    room: &mut RoomRecord,
    identity: &ParticipantIdentity,
    kind: TrackKind,
    source: TrackSource,
) -> Result<TrackSid> {
    let sid = generate_sid();
    let info = PublicationInfo {
        sid: sid.clone(),
        kind,
        source,
    };
    {
        let participant = room
            .participants
            .get_mut(identity)
            .ok_or(RoomError::NotConnected)?;
        participant.publications.push(PublicationRecord::new(info.clone()));
    }
    broadcast(
        room,
        identity,
        BackendEvent::TrackPublished {
            participant: identity.clone(),
            publication: info,
        },
    );
    Ok(sid)
}

/// Drops a departed identity from every publication's subscriber set.
fn forget_subscriber(room: &mut RoomRecord, identity: &ParticipantIdentity) {
    for record in room.participants.values_mut() {
        for publication in &mut record.publications {
            publication.subscribers.remove(identity);
        }
    }
}

fn generate_sid() -> TrackSid {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    TrackSid::from(format!("TR_{}", suffix))
}

/// Accepts `local://<room-name>` urls.
fn parse_local_url(url: &str) -> Result<String> {
    let name = url
        .strip_prefix("local://")
        .ok_or_else(|| RoomError::Backend(format!("unsupported url '{}'", url)))?;
    if name.is_empty() {
        return Err(RoomError::Backend("url is missing a room name".to_string()));
    }
    Ok(name.to_string())
}

/// Accepts `identity[:display name]` development tokens.
fn parse_token(token: &str) -> Result<(ParticipantIdentity, String)> {
    let token = token.trim();
    let (identity, name) = match token.split_once(':') {
        Some((identity, name)) => (identity.trim(), name.trim()),
        None => (token, token),
    };
    if identity.is_empty() {
        return Err(RoomError::Backend("token is missing an identity".to_string()));
    }
    let name = if name.is_empty() { identity } else { name };
    Ok((ParticipantIdentity::from(identity), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_url() {
        assert_eq!(parse_local_url("local://demo-room").unwrap(), "demo-room");
        assert!(parse_local_url("wss://example.com").is_err());
        assert!(parse_local_url("local://").is_err());
    }

    #[test]
    fn test_parse_token_with_and_without_name() {
        let (identity, name) = parse_token("guest:Guest One").unwrap();
        assert_eq!(identity.as_str(), "guest");
        assert_eq!(name, "Guest One");

        let (identity, name) = parse_token("mediator").unwrap();
        assert_eq!(identity.as_str(), "mediator");
        assert_eq!(name, "mediator");

        assert!(parse_token("").is_err());
        assert!(parse_token(":No Identity").is_err());
    }

    #[test]
    fn test_generated_sids_are_unique_and_prefixed() {
        let a = generate_sid();
        let b = generate_sid();
        assert!(a.as_str().starts_with("TR_"));
        assert_eq!(a.as_str().len(), 15);
        assert_ne!(a, b);
    }

    #[test]
    fn test_scripted_participant_appears_in_stats() {
        let service = LocalRoomService::new();
        let sids = service
            .add_scripted_participant(
                "demo",
                "mediator",
                "Mediator",
                &[
                    (TrackKind::Audio, TrackSource::Microphone),
                    (TrackKind::Video, TrackSource::Camera),
                ],
            )
            .unwrap();
        assert_eq!(sids.len(), 2);
        assert_eq!(service.participant_count("demo"), 1);
        let stats = service.publication_stats("demo", &sids[0]).unwrap();
        assert_eq!(stats.subscribe_requests, 0);
    }

    #[test]
    fn test_duplicate_scripted_identity_rejected() {
        let service = LocalRoomService::new();
        service
            .add_scripted_participant("demo", "mediator", "Mediator", &[])
            .unwrap();
        let result = service.add_scripted_participant("demo", "mediator", "Mediator", &[]);
        assert!(matches!(result, Err(RoomError::Backend(_))));
    }

    #[test]
    fn test_remove_participant_reports_presence() {
        let service = LocalRoomService::new();
        service
            .add_scripted_participant("demo", "mediator", "Mediator", &[])
            .unwrap();
        assert!(service.remove_participant("demo", "mediator").unwrap());
        assert!(!service.remove_participant("demo", "mediator").unwrap());
        assert_eq!(service.participant_count("demo"), 0);
    }
}
