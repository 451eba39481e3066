/// Where the session currently stands, as the UI sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionPhase {
    /// Worker is running the bootstrap sequence.
    Connecting,
    /// Fully connected and publishing media.
    Connected { room_name: String },
    /// A bootstrap step failed; the worker has stopped.
    Failed { step: &'static str, error: String },
    /// The session ended after having been connected.
    Disconnected,
}

impl ConnectionPhase {
    /// Human-readable status line for the room header.
    pub fn status_text(&self) -> String {
        match self {
            ConnectionPhase::Connecting => "Connecting...".to_string(),
            ConnectionPhase::Connected { room_name } => format!("Connected to {}", room_name),
            ConnectionPhase::Failed { step, error } => format!("{} failed: {}", step, error),
            ConnectionPhase::Disconnected => "Disconnected".to_string(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionPhase::Connected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(ConnectionPhase::Connecting.status_text(), "Connecting...");
        assert_eq!(
            ConnectionPhase::Connected {
                room_name: "demo-room".to_string()
            }
            .status_text(),
            "Connected to demo-room"
        );
        assert_eq!(
            ConnectionPhase::Failed {
                step: "connect",
                error: "room is full".to_string()
            }
            .status_text(),
            "connect failed: room is full"
        );
    }

    #[test]
    fn test_is_connected() {
        assert!(
            ConnectionPhase::Connected {
                room_name: "x".to_string()
            }
            .is_connected()
        );
        assert!(!ConnectionPhase::Connecting.is_connected());
        assert!(!ConnectionPhase::Disconnected.is_connected());
    }
}
