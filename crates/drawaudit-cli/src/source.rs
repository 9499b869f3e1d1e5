//! Input resolution and fetching.
//!
//! Inputs are either local paths or http(s) URLs. The core never sees
//! either; it only receives the fetched bytes.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors resolving or fetching audit inputs.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The flag combination does not name both inputs.
    #[error("{0}")]
    Usage(&'static str),
    /// Local file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// HTTP request failed or returned a non-success status.
    #[error("failed to fetch {url}: {source}")]
    Http {
        /// URL that failed.
        url: String,
        /// Underlying error.
        source: reqwest::Error,
    },
}

/// Where the artifact and the snapshot come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    /// `winners.json` path or URL.
    pub winners: String,
    /// `snapshot.csv` path or URL.
    pub snapshot: String,
}

impl Sources {
    /// Resolves explicit locations, or `{base}/{period}/...` when none are given.
    pub fn resolve(
        winners: Option<String>,
        snapshot: Option<String>,
        base: Option<&str>,
        period: Option<&str>,
    ) -> Result<Self, SourceError> {
        if winners.is_some() || snapshot.is_some() {
            return match (winners, snapshot) {
                (Some(winners), Some(snapshot)) => Ok(Self { winners, snapshot }),
                _ => Err(SourceError::Usage(
                    "When using explicit paths/URLs, provide BOTH --winners and --snapshot.",
                )),
            };
        }

        let (base, period) = match (base, period.map(str::trim)) {
            (Some(base), Some(period)) if !period.is_empty() => (base, period),
            _ => {
                return Err(SourceError::Usage(
                    "Provide --base and --period, or use --winners and --snapshot.",
                ))
            }
        };
        let base = base.trim_end_matches('/');
        Ok(Self {
            winners: format!("{base}/{period}/winners.json"),
            snapshot: format!("{base}/{period}/snapshot.csv"),
        })
    }

    /// Human label for where inputs come from.
    pub fn mode(&self) -> &'static str {
        match (is_url(&self.winners), is_url(&self.snapshot)) {
            (true, true) => "URL",
            (false, false) => "Local",
            _ => "Local/URL mixed",
        }
    }
}

/// Whether `location` is an http(s) URL.
pub fn is_url(location: &str) -> bool {
    Url::parse(location)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Reads a local file or fetches a URL, returning the whole body.
pub fn read_bytes(location: &str) -> Result<Vec<u8>, SourceError> {
    if is_url(location) {
        tracing::debug!(url = location, "fetching");
        fetch(location).map_err(|source| SourceError::Http {
            url: location.to_string(),
            source,
        })
    } else {
        tracing::debug!(path = location, "reading");
        std::fs::read(location).map_err(|source| SourceError::Io {
            path: location.to_string(),
            source,
        })
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("drawaudit/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let body = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_and_period_build_both_urls() {
        let sources =
            Sources::resolve(None, None, Some("https://audit.example.com/"), Some(" 2025-01 "))
                .unwrap();
        assert_eq!(
            sources.winners,
            "https://audit.example.com/2025-01/winners.json"
        );
        assert_eq!(
            sources.snapshot,
            "https://audit.example.com/2025-01/snapshot.csv"
        );
        assert_eq!(sources.mode(), "URL");
    }

    #[test]
    fn explicit_sources_need_both() {
        assert!(matches!(
            Sources::resolve(Some("w.json".into()), None, None, None),
            Err(SourceError::Usage(_))
        ));
        let sources = Sources::resolve(
            Some("w.json".into()),
            Some("https://x.test/s.csv".into()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(sources.mode(), "Local/URL mixed");
    }

    #[test]
    fn nothing_given_is_a_usage_error() {
        assert!(matches!(
            Sources::resolve(None, None, Some("https://x.test"), None),
            Err(SourceError::Usage(_))
        ));
    }

    #[test]
    fn windows_style_paths_are_not_urls() {
        assert!(!is_url("C:\\draws\\winners.json"));
        assert!(!is_url("./winners.json"));
        assert!(is_url("http://localhost:8080/w.json"));
    }
}
