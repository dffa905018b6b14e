use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ContentHash;
use crate::exception::UploadException;

const MAX_FILE_NAME_BYTES: usize = 255;

/// Name of a stored file, a single plain component directly under the storage root.
///
/// Names starting with `.` are reserved for temporaries and names shaped like a
/// content hash are reserved for staging directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FileName {
    type Err = UploadException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reason = if s.is_empty() {
            Some("is empty")
        } else if s.len() > MAX_FILE_NAME_BYTES {
            Some("is too long")
        } else if s.contains(['/', '\\', '\0']) {
            Some("contains a path separator")
        } else if s.starts_with('.') {
            Some("starts with a dot")
        } else if ContentHash::is_well_formed(s) {
            Some("is shaped like a content hash")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(UploadException::invalid(format!(
                r#"file name "{s}" {reason}"#
            ))),
            None => Ok(Self(s.to_owned())),
        }
    }
}

impl TryFrom<String> for FileName {
    type Error = UploadException;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FileName> for String {
    fn from(value: FileName) -> Self {
        value.0
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
