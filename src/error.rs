// Error handling module
// Defines the terminal failure taxonomy for the token manager task

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single exchange against the authority's token endpoint
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Network or connection failure before a response was received
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The authority answered with a non-200 status
    #[error("authority answered with status {status}")]
    Authority { status: StatusCode },

    /// The response body could not be decoded as a token response
    #[error("malformed token response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Terminal outcomes of the token manager's run loop
///
/// None of these are retried: a single failed exchange stops the task.
#[derive(Error, Debug)]
pub enum TokenTaskError {
    /// The initial password-grant exchange failed
    #[error("authentication failed: {0}")]
    Authentication(#[source] ExchangeError),

    /// A scheduled refresh-grant exchange failed
    #[error("token refresh failed: {0}")]
    Refresh(#[source] ExchangeError),

    /// An operation required a credential but none has been installed yet
    #[error("no credential installed")]
    NotAuthenticated,

    /// The task context was cancelled while waiting for the renewal deadline
    #[error("cancelled while waiting for renewal")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_error_message() {
        let err = ExchangeError::Authority {
            status: StatusCode::UNAUTHORIZED,
        };
        assert_eq!(
            err.to_string(),
            "authority answered with status 401 Unauthorized"
        );
    }

    #[test]
    fn test_authentication_error_wraps_exchange() {
        let err = TokenTaskError::Authentication(ExchangeError::Authority {
            status: StatusCode::FORBIDDEN,
        });
        assert_eq!(
            err.to_string(),
            "authentication failed: authority answered with status 403 Forbidden"
        );
    }

    #[test]
    fn test_refresh_error_wraps_exchange() {
        let err = TokenTaskError::Refresh(ExchangeError::Authority {
            status: StatusCode::BAD_REQUEST,
        });
        assert_eq!(
            err.to_string(),
            "token refresh failed: authority answered with status 400 Bad Request"
        );
    }

    #[test]
    fn test_cancelled_error_message() {
        let err = TokenTaskError::Cancelled;
        assert_eq!(err.to_string(), "cancelled while waiting for renewal");
    }

    #[test]
    fn test_not_authenticated_message() {
        let err = TokenTaskError::NotAuthenticated;
        assert_eq!(err.to_string(), "no credential installed");
    }
}
