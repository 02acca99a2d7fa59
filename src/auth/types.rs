// Authentication types
// Wire structs for the token endpoint and the domain Credential value

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Password-grant request body
#[derive(Serialize, Debug)]
pub struct PasswordGrantRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Refresh-grant request body
#[derive(Serialize, Debug)]
pub struct RefreshGrantRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

/// Token endpoint response body, identical for both grants
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<serde_json::Value>,
}

/// Immutable credential issued by the authority
///
/// A new `Credential` always replaces the previous one as a whole;
/// fields are never updated in place.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
    pub scope: Option<serde_json::Value>,

    /// Wall-clock expiry, for logging
    pub expires_at: DateTime<Utc>,

    /// Deadline for the proactive refresh: issuance + expires_in - safety margin.
    /// The margin equals the outbound request timeout, so the refresh call
    /// itself completes before the token actually expires.
    pub renew_at: Instant,
}

impl Credential {
    /// Build a credential from a token response received just now
    pub fn issue(response: TokenResponse, safety_margin: Duration) -> Self {
        let validity = Duration::from_secs(response.expires_in);
        let renew_at = Instant::now() + validity.saturating_sub(safety_margin);
        let expires_at = Utc::now() + chrono::Duration::seconds(response.expires_in as i64);

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            token_type: response.token_type,
            scope: response.scope,
            expires_at,
            renew_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in,
            token_type: "Bearer".to_string(),
            scope: None,
        }
    }

    #[tokio::test]
    async fn test_renew_at_subtracts_safety_margin() {
        let before = Instant::now();
        let credential = Credential::issue(response(100), Duration::from_secs(10));
        let after = Instant::now();

        // renew_at should land 90 seconds out, give or take the call itself
        assert!(credential.renew_at >= before + Duration::from_secs(90));
        assert!(credential.renew_at <= after + Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_renew_at_saturates_for_short_validity() {
        // Validity shorter than the margin renews immediately, not in the past
        let before = Instant::now();
        let credential = Credential::issue(response(5), Duration::from_secs(10));
        assert!(credential.renew_at >= before);
        assert!(credential.renew_at <= Instant::now());
    }

    #[test]
    fn test_response_decodes_with_optional_scope() {
        let body = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "Bearer"
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "a");
        assert_eq!(response.expires_in, 3600);
        assert!(response.scope.is_none());

        let body = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "Bearer",
            "scope": ["all"]
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert!(response.scope.is_some());
    }

    #[test]
    fn test_password_grant_serializes_protocol_fields() {
        let request = PasswordGrantRequest {
            client_id: "cid",
            client_secret: "secret",
            grant_type: "password",
            username: "user",
            password: "pass",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["grant_type"], "password");
        assert_eq!(json["client_id"], "cid");
        assert_eq!(json["username"], "user");
    }

    #[test]
    fn test_refresh_grant_serializes_protocol_fields() {
        let request = RefreshGrantRequest {
            client_id: "cid",
            client_secret: "secret",
            grant_type: "refresh_token",
            refresh_token: "r",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["grant_type"], "refresh_token");
        assert_eq!(json["refresh_token"], "r");
    }
}
