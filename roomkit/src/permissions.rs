//! Subscription permissions the local participant grants over its tracks.

use crate::participant::ParticipantIdentity;
use crate::track::TrackKind;

/// One grant rule. Either scoped to a participant identity (optionally
/// widened to all of that participant's track kinds) or to a track kind
/// for every participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPermission {
    pub participant_identity: Option<ParticipantIdentity>,
    pub track_kind: Option<TrackKind>,
    pub all_tracks: bool,
}

impl TrackPermission {
    /// Grants one participant access to every local track.
    pub fn for_participant(identity: impl Into<ParticipantIdentity>) -> Self {
        Self {
            participant_identity: Some(identity.into()),
            track_kind: None,
            all_tracks: true,
        }
    }

    /// Grants every participant access to local tracks of one kind.
    pub fn for_kind(kind: TrackKind) -> Self {
        Self {
            participant_identity: None,
            track_kind: Some(kind),
            all_tracks: false,
        }
    }
}

/// The full permission set attached to the local participant's tracks.
///
/// With `all_participants_allowed` off, a subscription is granted only if
/// some rule matches the subscriber and the track kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPermissions {
    pub all_participants_allowed: bool,
    pub permissions: Vec<TrackPermission>,
}

impl Default for SubscriptionPermissions {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl SubscriptionPermissions {
    /// Everyone may subscribe to everything.
    pub fn allow_all() -> Self {
        Self {
            all_participants_allowed: true,
            permissions: Vec::new(),
        }
    }

    /// Decides whether `subscriber` may subscribe to a local track of
    /// `kind`.
    pub fn allows(&self, subscriber: &ParticipantIdentity, kind: TrackKind) -> bool {
        if self.all_participants_allowed {
            return true;
        }
        self.permissions.iter().any(|rule| match &rule.participant_identity {
            Some(identity) if identity == subscriber => {
                rule.all_tracks || rule.track_kind == Some(kind)
            }
            Some(_) => false,
            None => rule.track_kind == Some(kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(s: &str) -> ParticipantIdentity {
        ParticipantIdentity::from(s)
    }

    #[test]
    fn test_allow_all_ignores_rules() {
        let perms = SubscriptionPermissions::allow_all();
        assert!(perms.allows(&identity("anyone"), TrackKind::Video));
        assert!(perms.allows(&identity("anyone"), TrackKind::Audio));
    }

    #[test]
    fn test_default_deny_without_rules() {
        let perms = SubscriptionPermissions {
            all_participants_allowed: false,
            permissions: Vec::new(),
        };
        assert!(!perms.allows(&identity("anyone"), TrackKind::Audio));
    }

    #[test]
    fn test_participant_grant_covers_all_tracks() {
        let perms = SubscriptionPermissions {
            all_participants_allowed: false,
            permissions: vec![TrackPermission::for_participant("mediator")],
        };
        assert!(perms.allows(&identity("mediator"), TrackKind::Audio));
        assert!(perms.allows(&identity("mediator"), TrackKind::Video));
        assert!(!perms.allows(&identity("guest"), TrackKind::Audio));
    }

    #[test]
    fn test_kind_grant_covers_every_participant() {
        let perms = SubscriptionPermissions {
            all_participants_allowed: false,
            permissions: vec![TrackPermission::for_kind(TrackKind::Audio)],
        };
        assert!(perms.allows(&identity("guest"), TrackKind::Audio));
        assert!(!perms.allows(&identity("guest"), TrackKind::Video));
    }

    #[test]
    fn test_combined_agent_and_audio_policy() {
        // The bootstrap's policy: agent gets everything, the rest audio only.
        let perms = SubscriptionPermissions {
            all_participants_allowed: false,
            permissions: vec![
                TrackPermission::for_participant("mediator"),
                TrackPermission::for_kind(TrackKind::Audio),
            ],
        };
        assert!(perms.allows(&identity("mediator"), TrackKind::Video));
        assert!(perms.allows(&identity("mediator"), TrackKind::Audio));
        assert!(perms.allows(&identity("guest"), TrackKind::Audio));
        assert!(!perms.allows(&identity("guest"), TrackKind::Video));
    }
}
