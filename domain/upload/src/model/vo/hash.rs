use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::exception::UploadException;

static MD5_HEX: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9a-fA-F]{32}$").unwrap());

/// Md5 digest of a file's content, the deduplication key.
///
/// Always stored lower-cased, so `ABC...` and `abc...` address the same content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `s` has the shape of a content hash.
    pub fn is_well_formed(s: &str) -> bool {
        MD5_HEX.is_match(s)
    }
}

impl FromStr for ContentHash {
    type Err = UploadException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_well_formed(s) {
            return Err(UploadException::invalid(format!(
                r#"hash "{s}" is not a 32 characters hex md5 digest"#
            )));
        }
        Ok(Self(s.to_lowercase()))
    }
}

impl TryFrom<String> for ContentHash {
    type Error = UploadException;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentHash> for String {
    fn from(value: ContentHash) -> Self {
        value.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
