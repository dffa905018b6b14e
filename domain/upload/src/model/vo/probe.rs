use serde::Serialize;

/// Answer to "does the client need to upload this content".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum ProbeResult {
    /// Content is fully stored under some name.
    Stored,
    /// Some chunks are already staged, the client resumes with the missing ones.
    Partial { staged_chunks: Vec<u64> },
    /// Nothing is known, upload everything from chunk 0.
    Absent,
}

impl ProbeResult {
    pub fn exists(&self) -> bool {
        !matches!(self, ProbeResult::Absent)
    }

    pub fn staged_chunks(&self) -> Option<&[u64]> {
        match self {
            ProbeResult::Partial { staged_chunks } => Some(staged_chunks),
            _ => None,
        }
    }
}
