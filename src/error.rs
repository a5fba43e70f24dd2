use thiserror::Error;

/// Everything that can go wrong while purging connections.
///
/// `MissingSource` is the only batch-level error: it is reported once and no
/// requests are issued. The remaining variants are per-identifier; a failed
/// deletion never aborts or delays its siblings and is never retried.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("entities.connections object not found in the captured page state")]
    MissingSource,

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("value cannot be sent as an HTTP header: {0}")]
    BadHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid URL: {0}")]
    BadUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_matches_log_format() {
        assert_eq!(
            PurgeError::Status(500).to_string(),
            "HTTP error! status: 500"
        );
    }

    #[test]
    fn missing_source_display() {
        assert_eq!(
            PurgeError::MissingSource.to_string(),
            "entities.connections object not found in the captured page state"
        );
    }
}
