//! # RoomKit - Client-side room SDK contract
//!
//! This library defines the room session API a conferencing client is
//! written against, together with one in-process backend implementation.
//!
//! ## Public API
//!
//! External users should ONLY use these public types:
//!
//! ### Session API
//! - **`Room`** - The room session: connect, events, roster, subscriptions
//! - **`WeakRoom`** - Non-owning room handle for event handlers
//! - **`ConnectionState`** - Session lifecycle state
//! - **`RoomEvent`** / **`HandlerId`** - Event stream and handler tokens
//! - **`RoomOptions`** / **`ConnectOptions`** - Per-session configuration
//! - **`PublishDefaults`** / **`AdaptiveStreamOptions`** / **`PixelDensity`**
//! - **`VideoCodec`** - Preferred publish codec
//! - **`presets`** - Simulcast layer presets (`H216`, `H540`, `H720`)
//!
//! ### Participants & Tracks
//! - **`LocalParticipant`** - Publishing and permission control
//! - **`RemoteParticipant`** / **`RemoteTrackPublication`** - Roster data
//! - **`ParticipantIdentity`** / **`TrackSid`** - Identifiers
//! - **`TrackKind`** / **`TrackSource`** - Track classification
//! - **`LocalVideoTrack`** / **`LocalAudioTrack`** - Local media handles
//! - **`SubscriptionPermissions`** / **`TrackPermission`** - Grant rules
//!
//! ### Media & Processing
//! - **`VideoFrame`** - Raw RGBA frame
//! - **`VideoSource`** - Capture seam (synthetic `TestPatternSource` included)
//! - **`TrackProcessor`** - Pluggable per-frame video effect
//!
//! ### Encryption
//! - **`ExternalKeyProvider`** / **`KeyProviderOptions`** - Passphrase-derived
//!   key material
//! - **`E2eeOptions`** - E2EE configuration carried in `RoomOptions`
//!
//! ### Backend seam
//! - **`RoomBackend`** / **`BackendSession`** - What a media engine implements
//! - **`LocalRoomService`** - Bundled in-process backend with scripted
//!   participants and subscription bookkeeping
//!
//! ## Example Usage
//!
//! ```no_run
//! use roomkit::{ConnectOptions, LocalRoomService, Room, RoomOptions, TrackKind};
//! use std::sync::Arc;
//!
//! let service = Arc::new(LocalRoomService::new());
//! let room = Room::new(service.clone(), RoomOptions::default());
//!
//! room.on(|event| println!("room event: {:?}", event));
//! room.connect(
//!     "local://demo-room",
//!     "guest:Guest",
//!     ConnectOptions { auto_subscribe: false },
//! )
//! .unwrap();
//!
//! for participant in room.remote_participants() {
//!     for publication in &participant.publications {
//!         if publication.kind == TrackKind::Audio {
//!             room.set_subscribed(&publication.sid, true).unwrap();
//!         }
//!     }
//! }
//! ```

// Internal modules (not exposed publicly)
mod backend;
mod codec;
mod e2ee;
mod error;
mod events;
mod frame;
mod local;
mod options;
mod participant;
mod permissions;
pub mod presets;
mod processor;
mod publication;
mod room;
mod track;

// ===== PUBLIC API - Session =====
pub use error::{Result, RoomError};
pub use events::{HandlerId, RoomEvent};
pub use options::{AdaptiveStreamOptions, ConnectOptions, PixelDensity, PublishDefaults, RoomOptions};
pub use codec::VideoCodec;
pub use room::{ConnectionState, Room, WeakRoom};

// ===== PUBLIC API - Participants & Tracks =====
pub use participant::{LocalParticipant, ParticipantIdentity, RemoteParticipant};
pub use permissions::{SubscriptionPermissions, TrackPermission};
pub use publication::{LocalTrackPublication, RemoteTrackPublication};
pub use track::{LocalAudioTrack, LocalVideoTrack, TrackKind, TrackSid, TrackSource};

// ===== PUBLIC API - Media & Processing =====
pub use frame::{TestPatternSource, VideoFrame, VideoSource};
pub use processor::TrackProcessor;

// ===== PUBLIC API - Encryption =====
pub use e2ee::{E2eeOptions, ExternalKeyProvider, KeyProviderOptions};

// ===== PUBLIC API - Backend seam =====
pub use backend::{
    BackendConnection, BackendEvent, BackendSession, ConnectContext, ParticipantSnapshot,
    PublicationInfo, RoomBackend,
};
pub use local::{ConnectRecord, LocalRoomService, PublicationStats};
