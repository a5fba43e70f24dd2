use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::PurgeError;

const DELETE_URL: &str = "https://www.zazzle.com/svc/z3/connections/delete";
const ORIGIN: &str = "https://www.zazzle.com";
const REFERER: &str = "https://www.zazzle.com/my/account/contacts";
// The endpoint rejects requests that don't look like they come from the page,
// so the browser user agent is sent verbatim.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:141.0) Gecko/20100101 Firefox/141.0";
const CSRF_HEADER: &str = "X-Csrf-Token";
const CLIENT_TAG: &str = "js";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteConnectionRequest<'a> {
    connections_user_id: &'a str,
    client: &'a str,
}

/// Seam between the dispatcher and the network. The real [`Client`] talks to
/// the live endpoint; tests substitute an in-memory fake.
#[async_trait]
pub trait ConnectionRemover {
    /// Delete a single connection. `Ok` carries the parsed response body.
    async fn delete_connection(&self, user_id: &str) -> Result<Value, PurgeError>;
}

pub struct Client {
    client: reqwest::Client,
    delete_url: Url,
}

impl Client {
    /// Build a client carrying the session credentials of an already
    /// authenticated browser session: the CSRF token and the raw `Cookie`
    /// header value.
    pub fn new(csrf_token: &str, cookie: &str) -> Result<Self, PurgeError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(header::ORIGIN, header::HeaderValue::from_static(ORIGIN));
        headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));
        headers.insert(CSRF_HEADER, header::HeaderValue::from_str(csrf_token)?);
        headers.insert(header::COOKIE, header::HeaderValue::from_str(cookie)?);

        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .build()?,
            delete_url: Url::parse(DELETE_URL)?,
        })
    }
}

#[async_trait]
impl ConnectionRemover for Client {
    async fn delete_connection(&self, user_id: &str) -> Result<Value, PurgeError> {
        let response = self
            .client
            .post(self.delete_url.clone())
            .json(&DeleteConnectionRequest {
                connections_user_id: user_id,
                client: CLIENT_TAG,
            })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        classify_response(status, &body)
    }
}

/// A deletion succeeded only if the endpoint answered 2xx with a JSON body.
/// Non-2xx wins over body content; a 2xx body that isn't JSON is a parse
/// failure, not a success.
fn classify_response(status: StatusCode, body: &str) -> Result<Value, PurgeError> {
    if !status.is_success() {
        return Err(PurgeError::Status(status.as_u16()));
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_endpoint_contract() {
        let body = serde_json::to_string(&DeleteConnectionRequest {
            connections_user_id: "u1",
            client: CLIENT_TAG,
        })
        .unwrap();
        assert_eq!(body, r#"{"connectionsUserId":"u1","client":"js"}"#);
    }

    #[test]
    fn classify_success_returns_parsed_body() {
        let body = classify_response(StatusCode::OK, r#"{"ok":true}"#).unwrap();
        assert_eq!(body, serde_json::json!({"ok": true}));
    }

    #[test]
    fn classify_non_2xx_is_status_error_even_with_json_body() {
        let result = classify_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"ok":false}"#);
        assert!(matches!(result, Err(PurgeError::Status(500))));
    }

    #[test]
    fn classify_2xx_non_json_is_parse_error() {
        let result = classify_response(StatusCode::OK, "<html>session expired</html>");
        assert!(matches!(result, Err(PurgeError::Parse(_))));
    }

    #[test]
    fn classify_2xx_empty_body_is_parse_error() {
        let result = classify_response(StatusCode::NO_CONTENT, "");
        assert!(matches!(result, Err(PurgeError::Parse(_))));
    }

    #[test]
    fn client_rejects_csrf_token_with_control_characters() {
        let result = Client::new("tok\nen", "session=abc");
        assert!(matches!(result, Err(PurgeError::BadHeaderValue(_))));
    }

    #[test]
    fn client_accepts_ordinary_session_values() {
        assert!(Client::new("0123456789abcdef", "session=abc; z=1").is_ok());
    }
}
