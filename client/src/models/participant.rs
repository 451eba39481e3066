/// A remote participant as the UI tracks it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantEntry {
    pub identity: String,
    pub name: String,
}
