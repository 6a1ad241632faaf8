// file: src/storage/sas.rs
// version: 1.0.0
// guid: 90c5e2a7-4f16-4d38-b0c9-61a8d37e54f0

//! SAS URL parsing and path splicing

use crate::{error::SubmitAgentError, Result};
use url::Url;

/// A container SAS URL split into its resource URI and query string.
///
/// The split happens at the rightmost `?`, so blob paths containing `?` in
/// earlier segments keep their meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SasUrl {
    resource: String,
    query: String,
}

impl SasUrl {
    /// Parse a full SAS URL of the form `https://<account>/<container>?<token>`
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw).map_err(|e| {
            SubmitAgentError::ValidationError(format!("Invalid SAS URL: {}", e))
        })?;
        if parsed.scheme() != "https" {
            return Err(SubmitAgentError::ValidationError(format!(
                "SAS URL must use https, got {}",
                parsed.scheme()
            )));
        }

        let idx = raw.rfind('?').ok_or_else(|| {
            SubmitAgentError::ValidationError(
                "SAS URL carries no query string".to_string(),
            )
        })?;
        let query = &raw[idx + 1..];
        if query.is_empty() {
            return Err(SubmitAgentError::ValidationError(
                "SAS URL carries an empty query string".to_string(),
            ));
        }

        Ok(Self {
            resource: raw[..idx].to_string(),
            query: query.to_string(),
        })
    }

    /// Resource URI without the token
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Token query string without the leading `?`
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Splice `path` into the resource path, keeping the token:
    /// `https://a/c?q` + `dir` -> `https://a/c/dir?q`
    pub fn join(&self, path: &str) -> String {
        let sep = if path.starts_with('/') { "" } else { "/" };
        format!("{}{}{}?{}", self.resource, sep, path, self.query)
    }

    /// Full URL with the token reattached
    pub fn as_url(&self) -> String {
        format!("{}?{}", self.resource, self.query)
    }
}
