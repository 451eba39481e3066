//! Room lifecycle events and the handler registry backing `Room::on`.

use crate::participant::{ParticipantIdentity, RemoteParticipant};
use crate::publication::RemoteTrackPublication;
use crate::track::TrackSid;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Events emitted by a room over its lifetime.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A remote participant joined (or was already present at connect).
    ParticipantConnected { participant: RemoteParticipant },
    /// A remote participant left.
    ParticipantDisconnected { identity: ParticipantIdentity },
    /// A remote participant published a track after we connected.
    TrackPublished {
        participant: ParticipantIdentity,
        publication: RemoteTrackPublication,
    },
    /// A remote participant unpublished a track.
    TrackUnpublished {
        participant: ParticipantIdentity,
        sid: TrackSid,
    },
    /// This client disconnected from the room.
    Disconnected,
}

/// Token returned by `Room::on`, used to deregister the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Arc<dyn Fn(&RoomEvent) + Send + Sync + 'static>;

/// Registry of event handlers.
///
/// Dispatch snapshots the handler list and invokes callbacks without
/// holding the registry lock, so handlers may freely call back into the
/// room.
pub(crate) struct EventHandlers {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(HandlerId, Handler)>>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push((id, handler));
        }
        id
    }

    /// Removes a handler; returns whether it was registered.
    pub fn remove(&self, id: HandlerId) -> bool {
        let Ok(mut handlers) = self.handlers.lock() else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn emit(&self, event: &RoomEvent) {
        let snapshot: Vec<Handler> = match self.handlers.lock() {
            Ok(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
            Err(_) => return,
        };
        for handler in snapshot {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_handler(counter: Arc<AtomicUsize>) -> Handler {
        Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_emit_reaches_registered_handlers() {
        let handlers = EventHandlers::new();
        let count = Arc::new(AtomicUsize::new(0));
        handlers.add(counting_handler(Arc::clone(&count)));
        handlers.emit(&RoomEvent::Disconnected);
        handlers.emit(&RoomEvent::Disconnected);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_removed_handler_is_silent() {
        let handlers = EventHandlers::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = handlers.add(counting_handler(Arc::clone(&count)));
        assert!(handlers.remove(id));
        assert!(!handlers.remove(id));
        handlers.emit(&RoomEvent::Disconnected);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_may_reenter_registry() {
        // A handler adding another handler must not deadlock.
        let handlers = Arc::new(EventHandlers::new());
        let registry = Arc::clone(&handlers);
        handlers.add(Arc::new(move |_event| {
            registry.add(Arc::new(|_| {}));
        }));
        handlers.emit(&RoomEvent::Disconnected);
    }
}
