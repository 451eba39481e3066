//! The room session object.

use crate::backend::{BackendEvent, BackendSession, ConnectContext, RoomBackend};
use crate::error::{Result, RoomError};
use crate::events::{EventHandlers, HandlerId, RoomEvent};
use crate::options::{ConnectOptions, RoomOptions};
use crate::participant::{LocalParticipant, ParticipantIdentity, RemoteParticipant};
use crate::publication::RemoteTrackPublication;
use crate::track::TrackSid;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, Weak};
use std::thread;

/// Lifecycle state of a room session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A single room session.
///
/// Owned by whoever created it; configuration changes mean building a new
/// `Room`, never reconfiguring a live one. Event handlers that need to
/// call back into the room should capture a [`WeakRoom`] so the handler
/// registry never keeps the room alive on its own.
pub struct Room {
    inner: Arc<RoomInner>,
}

/// Non-owning handle for event handlers.
#[derive(Clone)]
pub struct WeakRoom {
    inner: Weak<RoomInner>,
}

impl WeakRoom {
    /// Upgrades to a usable room if it still exists.
    pub fn upgrade(&self) -> Option<Room> {
        self.inner.upgrade().map(|inner| Room { inner })
    }
}

struct RoomInner {
    backend: Arc<dyn RoomBackend>,
    options: RoomOptions,
    state: Mutex<ConnectionState>,
    e2ee_enabled: AtomicBool,
    name: Mutex<Option<String>>,
    session: Mutex<Option<Arc<dyn BackendSession>>>,
    local: Mutex<Option<Arc<LocalParticipant>>>,
    remotes: Mutex<HashMap<ParticipantIdentity, RemoteParticipant>>,
    handlers: EventHandlers,
}

impl Room {
    /// Creates a disconnected room over the given backend.
    pub fn new(backend: Arc<dyn RoomBackend>, options: RoomOptions) -> Self {
        Self {
            inner: Arc::new(RoomInner {
                backend,
                options,
                state: Mutex::new(ConnectionState::Disconnected),
                e2ee_enabled: AtomicBool::new(false),
                name: Mutex::new(None),
                session: Mutex::new(None),
                local: Mutex::new(None),
                remotes: Mutex::new(HashMap::new()),
                handlers: EventHandlers::new(),
            }),
        }
    }

    pub fn options(&self) -> &RoomOptions {
        &self.inner.options
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner
            .state
            .lock()
            .map(|state| *state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Room name, known once connected.
    pub fn name(&self) -> Option<String> {
        self.inner.name.lock().ok().and_then(|name| name.clone())
    }

    pub fn e2ee_enabled(&self) -> bool {
        self.inner.e2ee_enabled.load(Ordering::SeqCst)
    }

    /// Turns end-to-end encryption on or off for the upcoming connection.
    ///
    /// Must be called before `connect`; enabling requires E2EE options
    /// with key material already installed. This ordering is what makes
    /// encryption readiness a hard gate in front of the connect call.
    ///
    /// # Errors
    ///
    /// [`RoomError::InvalidState`] when already connecting or connected,
    /// [`RoomError::Encryption`] when options or key material are missing.
    pub fn set_e2ee_enabled(&self, enabled: bool) -> Result<()> {
        let state = self.connection_state();
        if state != ConnectionState::Disconnected {
            return Err(RoomError::InvalidState(
                "encryption must be configured before connecting".to_string(),
            ));
        }
        if enabled {
            let e2ee = self
                .inner
                .options
                .e2ee
                .as_ref()
                .ok_or_else(|| RoomError::Encryption("no E2EE options configured".to_string()))?;
            if !e2ee.key_provider.has_key() {
                return Err(RoomError::Encryption("no key installed".to_string()));
            }
        }
        self.inner.e2ee_enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    /// Connects to the room. Blocks until the backend accepts or rejects.
    ///
    /// # Errors
    ///
    /// [`RoomError::InvalidState`] when not disconnected; backend errors
    /// pass through and leave the room disconnected.
    pub fn connect(&self, url: &str, token: &str, connect_options: ConnectOptions) -> Result<()> {
        {
            let mut state = self
                .inner
                .state
                .lock()
                .map_err(|_| RoomError::LockPoisoned)?;
            if *state != ConnectionState::Disconnected {
                return Err(RoomError::InvalidState(format!(
                    "connect called while {:?}",
                    *state
                )));
            }
            *state = ConnectionState::Connecting;
        }

        let key_installed = self
            .inner
            .options
            .e2ee
            .as_ref()
            .is_some_and(|e2ee| e2ee.key_provider.has_key());
        let ctx = ConnectContext {
            options: &self.inner.options,
            connect: connect_options,
            e2ee_enabled: self.e2ee_enabled(),
            key_installed,
        };

        let connection = match self.inner.backend.connect(url, token, ctx) {
            Ok(connection) => connection,
            Err(err) => {
                self.set_state(ConnectionState::Disconnected);
                return Err(err);
            }
        };

        {
            let mut remotes = self
                .inner
                .remotes
                .lock()
                .map_err(|_| RoomError::LockPoisoned)?;
            remotes.clear();
            for snapshot in connection.participants {
                remotes.insert(
                    snapshot.identity.clone(),
                    RemoteParticipant {
                        identity: snapshot.identity,
                        name: snapshot.name,
                        publications: snapshot
                            .publications
                            .into_iter()
                            .map(|info| RemoteTrackPublication {
                                sid: info.sid,
                                kind: info.kind,
                                source: info.source,
                                subscribed: false,
                            })
                            .collect(),
                    },
                );
            }
        }

        let local = Arc::new(LocalParticipant::new(
            connection.local_identity,
            connection.local_name,
            Arc::clone(&connection.session),
        ));
        if let Ok(mut guard) = self.inner.local.lock() {
            *guard = Some(local);
        }
        if let Ok(mut guard) = self.inner.session.lock() {
            *guard = Some(connection.session);
        }
        if let Ok(mut guard) = self.inner.name.lock() {
            *guard = Some(connection.room_name);
        }
        self.set_state(ConnectionState::Connected);

        spawn_dispatch_thread(Arc::clone(&self.inner), connection.events);
        Ok(())
    }

    /// Registers an event handler; events arrive on the dispatch thread.
    pub fn on(&self, handler: impl Fn(&RoomEvent) + Send + Sync + 'static) -> HandlerId {
        self.inner.handlers.add(Arc::new(handler))
    }

    /// Deregisters a handler. Returns whether it was registered.
    pub fn off(&self, id: HandlerId) -> bool {
        self.inner.handlers.remove(id)
    }

    /// Weak handle for handlers that call back into the room.
    pub fn downgrade(&self) -> WeakRoom {
        WeakRoom {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The local participant, available once connected.
    pub fn local_participant(&self) -> Option<Arc<LocalParticipant>> {
        self.inner.local.lock().ok().and_then(|guard| guard.clone())
    }

    /// Snapshot of the remote roster.
    pub fn remote_participants(&self) -> Vec<RemoteParticipant> {
        self.inner
            .remotes
            .lock()
            .map(|remotes| remotes.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of one remote participant.
    pub fn remote_participant(&self, identity: &ParticipantIdentity) -> Option<RemoteParticipant> {
        self.inner
            .remotes
            .lock()
            .ok()
            .and_then(|remotes| remotes.get(identity).cloned())
    }

    /// Requests or drops a subscription to a remote publication and
    /// mirrors the granted state into the roster.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotConnected`] without a session; backend errors pass
    /// through.
    pub fn set_subscribed(&self, sid: &TrackSid, subscribed: bool) -> Result<bool> {
        let session = self
            .inner
            .session
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?
            .clone()
            .ok_or(RoomError::NotConnected)?;
        let granted = session.set_subscribed(sid, subscribed)?;
        if let Ok(mut remotes) = self.inner.remotes.lock() {
            for participant in remotes.values_mut() {
                if let Some(publication) =
                    participant.publications.iter_mut().find(|p| &p.sid == sid)
                {
                    publication.subscribed = granted;
                }
            }
        }
        Ok(granted)
    }

    /// Leaves the room and stops local capture. Idempotent.
    pub fn disconnect(&self) {
        let session = self
            .inner
            .session
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        let Some(session) = session else {
            return;
        };

        if let Ok(mut local) = self.inner.local.lock()
            && let Some(participant) = local.take()
        {
            participant.stop_tracks();
        }
        session.disconnect();
        if let Ok(mut remotes) = self.inner.remotes.lock() {
            remotes.clear();
        }
        self.set_state(ConnectionState::Disconnected);
        self.inner.handlers.emit(&RoomEvent::Disconnected);
    }

    fn set_state(&self, new_state: ConnectionState) {
        if let Ok(mut state) = self.inner.state.lock() {
            *state = new_state;
        }
    }
}

/// Applies backend events to the roster and fans them out to handlers.
/// Ends when the backend closes the event channel.
fn spawn_dispatch_thread(inner: Arc<RoomInner>, events: Receiver<BackendEvent>) {
    thread::spawn(move || {
        for event in events {
            let room_event = apply_backend_event(&inner, event);
            if let Some(room_event) = room_event {
                inner.handlers.emit(&room_event);
            }
        }
    });
}

/// Updates the roster under its lock, returning the public event to emit
/// after the lock is released.
fn apply_backend_event(inner: &RoomInner, event: BackendEvent) -> Option<RoomEvent> {
    let Ok(mut remotes) = inner.remotes.lock() else {
        return None;
    };
    match event {
        BackendEvent::ParticipantJoined(snapshot) => {
            let participant = RemoteParticipant {
                identity: snapshot.identity.clone(),
                name: snapshot.name,
                publications: snapshot
                    .publications
                    .into_iter()
                    .map(|info| RemoteTrackPublication {
                        sid: info.sid,
                        kind: info.kind,
                        source: info.source,
                        subscribed: false,
                    })
                    .collect(),
            };
            remotes.insert(snapshot.identity, participant.clone());
            Some(RoomEvent::ParticipantConnected { participant })
        }
        BackendEvent::ParticipantLeft(identity) => {
            remotes.remove(&identity);
            Some(RoomEvent::ParticipantDisconnected { identity })
        }
        BackendEvent::TrackPublished {
            participant,
            publication,
        } => {
            let publication = RemoteTrackPublication {
                sid: publication.sid,
                kind: publication.kind,
                source: publication.source,
                subscribed: false,
            };
            let entry = remotes
                .entry(participant.clone())
                .or_insert_with(|| RemoteParticipant {
                    identity: participant.clone(),
                    name: participant.to_string(),
                    publications: Vec::new(),
                });
            entry.publications.push(publication.clone());
            Some(RoomEvent::TrackPublished {
                participant,
                publication,
            })
        }
        BackendEvent::TrackUnpublished { participant, sid } => {
            if let Some(entry) = remotes.get_mut(&participant) {
                entry.publications.retain(|p| p.sid != sid);
            }
            Some(RoomEvent::TrackUnpublished { participant, sid })
        }
    }
}
