use thiserror::Error;

/// Errors raised by external collaborators.
///
/// Geocoding, distance and pricing failures are turned into user notices by
/// the calling component; submission failures surface
/// [`ProviderError::user_message`] verbatim when the backend supplied one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL that was requested.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Transport-level description.
        message: String,
    },
    /// The request could not be sent or the connection failed.
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// URL that was requested.
        url: String,
        /// Transport-level description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    ParseError {
        /// Decoder description.
        message: String,
    },
    /// The service answered with an application-level error status.
    #[error("service returned {code}: {message}")]
    ServiceError {
        /// Status code reported by the service, e.g. `"INVALID_REQUEST"`.
        code: String,
        /// Message reported by the service, possibly empty.
        message: String,
    },
    /// The backend refused the request.
    #[error("request rejected{}", rejection_suffix(.message.as_deref()))]
    Rejected {
        /// Message supplied by the backend, shown to the user as-is.
        message: Option<String>,
    },
}

impl ProviderError {
    /// The collaborator's own message, suitable for showing verbatim.
    ///
    /// Only backend rejections and non-empty service errors carry one;
    /// transport failures return `None` so callers fall back to a generic
    /// notice.
    ///
    /// # Examples
    /// ```
    /// use freight_core::ProviderError;
    ///
    /// let err = ProviderError::Rejected { message: Some("Vehicle already booked".into()) };
    /// assert_eq!(err.user_message(), Some("Vehicle already booked"));
    /// let err = ProviderError::ParseError { message: "eof".into() };
    /// assert_eq!(err.user_message(), None);
    /// ```
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => message.as_deref().filter(|m| !m.trim().is_empty()),
            Self::ServiceError { message, .. } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

fn rejection_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}
