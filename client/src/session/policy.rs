//! Subscription Policy
//!
//! Who may watch us, and which remote tracks we pull down. The room
//! connects with auto-subscribe off, so every subscription here is an
//! explicit decision.

use logging::Logger;
use roomkit::{
    ParticipantIdentity, RemoteTrackPublication, Room, SubscriptionPermissions, TrackKind,
    TrackPermission,
};

/// Permissions for our own published tracks: locked down for everyone,
/// except the room agent (all tracks) and audio for any participant.
pub fn subscription_permissions(agent_identity: &str) -> SubscriptionPermissions {
    SubscriptionPermissions {
        all_participants_allowed: false,
        permissions: vec![
            TrackPermission::for_participant(agent_identity),
            TrackPermission::for_kind(TrackKind::Audio),
        ],
    }
}

/// Applies the subscription policy to one remote publication: pull
/// audio, drop video.
///
/// Runs once per publication, both for tracks announced by events and
/// for tracks found in the post-connect sweep. Failures never stop the
/// session; audio failures are logged, video unsubscribes are advisory.
pub fn apply_publication_policy(
    room: &Room,
    participant: &ParticipantIdentity,
    publication: &RemoteTrackPublication,
    logger: &Logger,
) {
    match publication.kind {
        TrackKind::Audio => {
            if let Err(e) = room.set_subscribed(&publication.sid, true) {
                logger.warn(&format!(
                    "[POLICY] Failed to subscribe to audio track {} from {}: {}",
                    publication.sid.as_str(),
                    participant.as_str(),
                    e
                ));
            }
        }
        TrackKind::Video => {
            // Stray video subscriptions are harmless, dropping them is
            // best effort.
            let _ = room.set_subscribed(&publication.sid, false);
        }
    }
}
