//! Panel API client.
//!
//! # Responsibilities
//! - Log in against the panel and hand out a session token
//! - Derive account status by repeating the login call
//! - Answer the endpoints the panel does not implement locally
//!
//! All network traffic goes through the shared [`FallbackDispatcher`].

use std::sync::Arc;

use serde_json::Value;

use crate::api::types::{
    lenient_bool, ApiError, ApiResult, Credentials, LoginRequest, SessionToken, StatusResponse,
    DEFAULT_REJECTION_MESSAGE,
};
use crate::fallback::{Exchange, FallbackDispatcher, RequestDescriptor};

/// Login endpoint; it is also the only source of status data.
pub const LOGIN_PATH: &str = "/panel.php?api=login";

const JSON: &str = "application/json";

/// Platform reported by [`PanelClient::report_update`].
pub const DEFAULT_PLATFORM: &str = "android";

/// Client for the panel API.
#[derive(Debug, Clone)]
pub struct PanelClient {
    dispatcher: Arc<FallbackDispatcher>,
}

impl PanelClient {
    pub fn new(dispatcher: Arc<FallbackDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<FallbackDispatcher> {
        &self.dispatcher
    }

    /// Log in and return a session token.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<SessionToken> {
        tracing::debug!(
            username = %credentials.username,
            device_id = ?credentials.device_id,
            app_version = ?credentials.app_version,
            "Logging in"
        );
        let exchange = self
            .post_login(&credentials.username, &credentials.password)
            .await?;
        interpret_login(&exchange, &credentials.username, &credentials.password)
    }

    /// Fetch account status by logging in again with the token's credentials.
    pub async fn status(&self, token: &SessionToken) -> ApiResult<StatusResponse> {
        let (username, password) = token.credentials().ok_or(ApiError::InvalidCredentials)?;
        let exchange = self.post_login(username, password).await?;
        interpret_status(&exchange)
    }

    /// The panel has no keep-alive endpoint; always succeeds.
    pub async fn keep_alive(&self, _token: &SessionToken) -> ApiResult<()> {
        Ok(())
    }

    /// The panel has no push registration; always succeeds.
    pub async fn update_fcm_token(&self, _token: &SessionToken, _fcm_token: &str) -> ApiResult<()> {
        Ok(())
    }

    /// Sessions are stateless on the panel; always succeeds.
    pub async fn logout(&self, _token: &SessionToken) -> ApiResult<()> {
        Ok(())
    }

    /// The panel does not track update prompts; always succeeds.
    pub async fn update_prompt_seen(&self, _token: &SessionToken) -> ApiResult<()> {
        Ok(())
    }

    /// Report an installed version for the default platform.
    pub async fn report_update(&self, token: &SessionToken, version: &str) -> ApiResult<()> {
        self.report_update_for(token, DEFAULT_PLATFORM, version).await
    }

    /// The panel does not collect version reports; always succeeds.
    pub async fn report_update_for(
        &self,
        _token: &SessionToken,
        platform: &str,
        version: &str,
    ) -> ApiResult<()> {
        tracing::trace!(platform, version, "Update report not sent, panel has no endpoint");
        Ok(())
    }

    async fn post_login(&self, username: &str, password: &str) -> ApiResult<Exchange> {
        let request = login_request(username, password)?;
        Ok(self.dispatcher.dispatch(&request).await?)
    }
}

/// JSON login POST; the content type rides on the body.
fn login_request(username: &str, password: &str) -> ApiResult<RequestDescriptor> {
    let body = serde_json::to_vec(&LoginRequest { username, password })?;
    Ok(RequestDescriptor::post(LOGIN_PATH)
        .with_header("Accept", JSON)
        .with_body(body, Some(JSON)))
}

fn parse_body(exchange: &Exchange) -> ApiResult<Value> {
    serde_json::from_str(&exchange.body).map_err(|_| ApiError::InvalidBody {
        body: exchange.body.clone(),
    })
}

/// Turn a login reply into a token or the matching error.
pub fn interpret_login(exchange: &Exchange, username: &str, password: &str) -> ApiResult<SessionToken> {
    if !exchange.is_success() {
        return Err(ApiError::Http(exchange.status));
    }
    let reply = parse_body(exchange)?;
    if lenient_bool(reply.get("success")) {
        return Ok(SessionToken::new(username, password));
    }
    let message = reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_REJECTION_MESSAGE);
    Err(ApiError::Rejected(message.to_string()))
}

/// Turn a login reply into account status.
pub fn interpret_status(exchange: &Exchange) -> ApiResult<StatusResponse> {
    if !exchange.is_success() {
        return Err(ApiError::Http(exchange.status));
    }
    let reply = parse_body(exchange)?;
    if !lenient_bool(reply.get("success")) {
        return Err(ApiError::AuthFailed);
    }
    match reply.get("data") {
        Some(data) if data.is_object() => Ok(StatusResponse::from_panel_data(data)),
        _ => Err(ApiError::InvalidBody {
            body: exchange.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{CandidateList, HttpTransport};
    use std::time::Duration;

    fn exchange(status: u16, body: &str) -> Exchange {
        Exchange {
            status,
            body: body.to_string(),
        }
    }

    fn offline_client() -> PanelClient {
        let transport =
            HttpTransport::new(Duration::from_millis(200), Duration::from_millis(200)).unwrap();
        let dispatcher = FallbackDispatcher::new(CandidateList::new(["not a url"]), transport);
        PanelClient::new(Arc::new(dispatcher))
    }

    #[test]
    fn test_login_request_sets_content_type_once() {
        let request = login_request("bob", "pw").unwrap();
        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), LOGIN_PATH);
        assert_eq!(request.content_type(), Some(JSON));
        assert!(request
            .headers()
            .keys()
            .all(|name| !name.eq_ignore_ascii_case("content-type")));
        assert_eq!(request.headers().get("Accept").map(String::as_str), Some(JSON));

        let body: Value = serde_json::from_slice(request.body().unwrap()).unwrap();
        assert_eq!(body["username"], "bob");
        assert_eq!(body["password"], "pw");
    }

    #[test]
    fn test_login_success_builds_token() {
        let token = interpret_login(&exchange(200, r#"{"success":true}"#), "bob", "pw").unwrap();
        assert_eq!(token.as_str(), "bob:pw");
    }

    #[test]
    fn test_login_rejection_uses_panel_message() {
        let err = interpret_login(
            &exchange(200, r#"{"success":false,"message":"account disabled"}"#),
            "bob",
            "pw",
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == "account disabled"));
    }

    #[test]
    fn test_login_rejection_default_message() {
        let err = interpret_login(&exchange(200, "{}"), "bob", "pw").unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == DEFAULT_REJECTION_MESSAGE));
    }

    #[test]
    fn test_login_http_error_and_bad_json() {
        let err = interpret_login(&exchange(503, "down"), "bob", "pw").unwrap_err();
        assert!(matches!(err, ApiError::Http(503)));

        let err = interpret_login(&exchange(200, "<html>"), "bob", "pw").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody { body } if body == "<html>"));
    }

    #[test]
    fn test_status_requires_success_and_data() {
        let err = interpret_status(&exchange(200, r#"{"success":false}"#)).unwrap_err();
        assert!(matches!(err, ApiError::AuthFailed));

        let err = interpret_status(&exchange(200, r#"{"success":true}"#)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody { .. }));

        let status = interpret_status(&exchange(
            200,
            r#"{"success":true,"data":{"username":"bob","traffic":{"total":5,"used":2}}}"#,
        ))
        .unwrap();
        assert_eq!(status.username, "bob");
        assert_eq!(status.data_limit, 5);
        assert_eq!(status.used_traffic, 2);
        assert_eq!(status.expire, 0);
    }

    #[tokio::test]
    async fn test_status_rejects_malformed_token_without_network() {
        let err = offline_client()
            .status(&SessionToken::from_raw("no-separator"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unsupported_endpoints_succeed() {
        let client = offline_client();
        let token = SessionToken::new("bob", "pw");
        assert!(client.keep_alive(&token).await.is_ok());
        assert!(client.update_fcm_token(&token, "fcm").await.is_ok());
        assert!(client.logout(&token).await.is_ok());
        assert!(client.update_prompt_seen(&token).await.is_ok());
        assert!(client.report_update(&token, "1.2.3").await.is_ok());
        assert!(client.report_update_for(&token, "ios", "1.2.3").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_surfaces_dispatch_failure() {
        let err = offline_client()
            .login(&Credentials::new("bob", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Dispatch(_)));
    }
}
