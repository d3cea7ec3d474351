//! HTTP transport for StreamOne API commands.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, warn};

use super::{Arguments, RequestError, Response};
use crate::auth::AuthenticationType;
use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL of the API
pub const DEFAULT_API_URL: &str = "https://api.streamonecloud.net";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const AUTHENTICATION_TYPE_HEADER: &str = "x-streamone-authentication-type";
const ACTOR_HEADER: &str = "x-streamone-actor";
const ACTOR_KEY_HEADER: &str = "x-streamone-actor-key";
const SESSION_HEADER: &str = "x-streamone-session";
const SESSION_KEY_HEADER: &str = "x-streamone-session-key";

/// Session credentials attached to a session request
pub(crate) struct SessionCredentials<'a> {
    pub id: &'a str,
    pub key: &'a str,
}

/// API client for StreamOne.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    authentication: AuthenticationType,
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    pub fn new(api_url: impl Into<String>, authentication: AuthenticationType) -> Result<Self> {
        Self::with_timeout(
            api_url,
            authentication,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        api_url: impl Into<String>,
        authentication: AuthenticationType,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            authentication,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn authentication(&self) -> &AuthenticationType {
        &self.authentication
    }

    /// Send a command without session authentication.
    pub async fn send(&self, command: &str, action: &str, args: &Arguments) -> Result<Response> {
        self.execute(command, action, args, None).await
    }

    pub(crate) async fn execute(
        &self,
        command: &str,
        action: &str,
        args: &Arguments,
        session: Option<SessionCredentials<'_>>,
    ) -> Result<Response> {
        let url = self.endpoint(command, action);
        debug!(
            command = %command,
            action = %action,
            actor = %self.authentication,
            with_session = session.is_some(),
            "Sending API request"
        );

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header(AUTHENTICATION_TYPE_HEADER, self.authentication.kind())
            .header(ACTOR_HEADER, self.authentication.id())
            .header(ACTOR_KEY_HEADER, self.authentication.psk())
            .form(args.as_pairs());

        if let Some(session) = session {
            request = request
                .header(SESSION_HEADER, session.id)
                .header(SESSION_KEY_HEADER, session.key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, command = %command, action = %action, "API request failed");
            return Err(RequestError::from_http_status(status, &body).into());
        }

        let bytes = response.bytes().await?;
        let decoded: Response = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, command = %command, action = %action, "Failed to parse API response");
            RequestError::CanNotConvertBody
        })?;

        if !decoded.success() {
            debug!(
                status = decoded.header.status,
                message = %decoded.header.status_message,
                "API reported failure"
            );
        }
        Ok(decoded)
    }

    fn endpoint(&self, command: &str, action: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.api_url.trim_end_matches('/'),
            command,
            action
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_auth() -> AuthenticationType {
        AuthenticationType::application("portal", "app-psk")
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ApiClient::new("https://example.test/", app_auth()).unwrap();
        assert_eq!(
            client.endpoint("item", "view"),
            "https://example.test/api/item/view"
        );
    }

    #[tokio::test]
    async fn test_send_attaches_identity_and_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/item/view"))
            .and(header_eq(AUTHENTICATION_TYPE_HEADER, "application"))
            .and(header_eq(ACTOR_HEADER, "portal"))
            .and(header_eq(ACTOR_KEY_HEADER, "app-psk"))
            .and(body_string_contains("limit=10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "header": { "status": 0, "statusmessage": "OK" },
                "body": { "id": "abc" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), app_auth()).unwrap();
        let args = Arguments::new().with("limit", 10u32);
        let response = client.send("item", "view", &args).await.unwrap();

        assert!(response.success());
        assert_eq!(response.body["id"], "abc");
    }

    #[tokio::test]
    async fn test_http_failure_maps_to_no_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), app_auth()).unwrap();
        let err = client
            .send("item", "view", &Arguments::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.as_request_error(),
            Some(&RequestError::NoSuccess {
                status: 503,
                message: "maintenance".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_envelope_cannot_convert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), app_auth()).unwrap();
        let err = client
            .send("item", "view", &Arguments::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.as_request_error(),
            Some(&RequestError::CanNotConvertBody)
        );
    }
}
