//! Response shapes of the GitHub REST endpoints used by the walker
//!
//! Only the fields the crawl reads are declared; everything else in the
//! payloads is ignored.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

/// Entry of `GET /repos/{owner}/{repo}/issues`
///
/// The issues endpoint also lists pull requests; those carry a
/// `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub url: String,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub comments: u64,
    pub body: Option<String>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Deserialize)]
pub struct PullSummary {
    pub number: u64,
    pub url: String,
    pub title: String,
    pub state: String,
    pub body: Option<String>,
}

/// The part of `GET /repos/{owner}/{repo}/pulls/{number}` the list omits
#[derive(Debug, Clone, Deserialize)]
pub struct PullDetail {
    #[serde(default)]
    pub comments: u64,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// Entry of a directory listing from `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    pub url: String,
}

/// A single file from `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub path: String,
    pub url: String,
    /// Absent or empty for files above the inline size limit
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentFile {
    /// Returns the file bytes, decoding base64 when the payload says so
    ///
    /// Returns `Ok(None)` when no inline content is available.
    pub fn decoded(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        let Some(content) = self.content.as_deref() else {
            return Ok(None);
        };

        match self.encoding.as_deref() {
            Some("base64") => {
                // The API wraps base64 payloads at 60 columns
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                STANDARD.decode(compact).map(Some)
            }
            Some("none") => Ok(None),
            _ => Ok(Some(content.as_bytes().to_vec())),
        }
    }
}
