//! `reqwest` implementation of [`AuthService`]. Both endpoints take a JSON body
//! and answer with the `{ statusCode, data, message }` envelope. No timeout is
//! applied; a call resolves when the backend answers or the connection fails.

use super::{AuthResponse, AuthService, LoginRequest, RegisterRequest, RemoteAuthError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_LOGIN_PATH: &str = "/users/login";
pub const DEFAULT_REGISTER_PATH: &str = "/users/register";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub login_path: String,
    pub register_path: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            register_path: DEFAULT_REGISTER_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_register_path(mut self, path: impl Into<String>) -> Self {
        self.register_path = path.into();
        self
    }

    /// Join `path` onto the API base URL.
    ///
    /// # Errors
    /// Returns `RemoteAuthError::Endpoint` if the result is not an absolute
    /// http(s) URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, RemoteAuthError> {
        let base = self.api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let url = Url::parse(&format!("{base}/{path}"))
            .map_err(|e| RemoteAuthError::Endpoint(format!("{}: {e}", self.api_url)))?;

        if matches!(url.scheme(), "http" | "https") {
            Ok(url)
        } else {
            Err(RemoteAuthError::Endpoint(format!(
                "unsupported scheme {}",
                url.scheme()
            )))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: Client,
    login_url: Url,
    register_url: Url,
}

impl HttpAuthService {
    /// Build a client for the given endpoints.
    ///
    /// # Errors
    /// Returns an error if an endpoint URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(endpoints: &Endpoints) -> Result<Self, RemoteAuthError> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .map_err(|e| RemoteAuthError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            login_url: endpoints.endpoint_url(&endpoints.login_path)?,
            register_url: endpoints.endpoint_url(&endpoints.register_path)?,
        })
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    #[must_use]
    pub fn register_url(&self) -> &Url {
        &self.register_url
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn post<B: Serialize + Sync>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<AuthResponse, RemoteAuthError> {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteAuthError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteAuthError::Transport(e.to_string()))?;

        debug!("auth service responded with {status}");

        if !status.is_success() {
            let message = rejection_message(status, &text);
            warn!("auth service rejected request: {status}");
            return Err(RemoteAuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = if text.trim().is_empty() {
            Envelope::default()
        } else {
            serde_json::from_str::<Envelope>(&text)
                .map_err(|e| RemoteAuthError::Decode(e.to_string()))?
        };

        Ok(AuthResponse {
            status_code: envelope.status_code.unwrap_or_else(|| status.as_u16()),
            message: envelope.message,
            data: envelope.data,
        })
    }
}

/// Pick the message to show for an error response: the envelope `message`
/// when present, otherwise the HTTP reason phrase.
fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("Request failed ({}): {reason}", status.as_u16()),
            None => format!("Request failed ({})", status.as_u16()),
        })
}

impl AuthService for HttpAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, RemoteAuthError> {
        self.post(&self.login_url, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, RemoteAuthError> {
        self.post(&self.register_url, request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "a@b.com".to_string(),
            password: "abcdef".to_string(),
        }
    }

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let endpoints = Endpoints::new("https://api.example.com/v1/");
        assert_eq!(
            endpoints.endpoint_url("/users/login").unwrap().as_str(),
            "https://api.example.com/v1/users/login"
        );
        assert_eq!(
            endpoints.endpoint_url("users/register").unwrap().as_str(),
            "https://api.example.com/v1/users/register"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        assert!(matches!(
            Endpoints::new("not a url").endpoint_url("/login"),
            Err(RemoteAuthError::Endpoint(_))
        ));
        assert!(matches!(
            Endpoints::new("ftp://example.com").endpoint_url("/login"),
            Err(RemoteAuthError::Endpoint(_))
        ));
    }

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message(
                StatusCode::UNAUTHORIZED,
                r#"{"statusCode":401,"message":"Invalid credentials"}"#
            ),
            "Invalid credentials"
        );
        assert_eq!(
            rejection_message(StatusCode::NOT_FOUND, "<html>nope</html>"),
            "Request failed (404): Not Found"
        );
        assert_eq!(
            rejection_message(StatusCode::CONFLICT, r#"{"message":"  "}"#),
            "Request failed (409): Conflict"
        );
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "email": "a@b.com", "password": "abcdef" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "data": { "user": { "email": "a@b.com" } },
                "message": "User logged in successfully",
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpAuthService::new(&Endpoints::new(server.uri())).unwrap();
        let response = service.login(&login_request()).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.message.as_deref(),
            Some("User logged in successfully")
        );
        assert_eq!(
            response.data,
            Some(json!({ "user": { "email": "a@b.com" } }))
        );
    }

    #[tokio::test]
    async fn test_register_uses_envelope_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .and(body_json(json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "password": "Str0ng!pass"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 201,
                "message": "User registered"
            })))
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri()).with_register_path("/auth/signup");
        let service = HttpAuthService::new(&endpoints).unwrap();
        let response = service
            .register(&RegisterRequest {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "Str0ng!pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.status_code, 201);
    }

    #[tokio::test]
    async fn test_missing_status_code_falls_back_to_http_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/register"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let service = HttpAuthService::new(&Endpoints::new(server.uri())).unwrap();
        let response = service
            .register(&RegisterRequest {
                full_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "Str0ng!pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.status_code, 201);
        assert_eq!(response.message, None);
    }

    #[tokio::test]
    async fn test_error_response_carries_server_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "statusCode": 401,
                "message": "Invalid credentials",
                "success": false
            })))
            .mount(&server)
            .await;

        let service = HttpAuthService::new(&Endpoints::new(server.uri())).unwrap();
        let err = service.login(&login_request()).await.unwrap_err();

        assert_eq!(err, RemoteAuthError::rejected(401, "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome!"))
            .mount(&server)
            .await;

        let service = HttpAuthService::new(&Endpoints::new(server.uri())).unwrap();
        let err = service.login(&login_request()).await.unwrap_err();

        assert!(matches!(err, RemoteAuthError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0");
        let Ok(listener) = listener else {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        };
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let service =
            HttpAuthService::new(&Endpoints::new(format!("http://127.0.0.1:{port}"))).unwrap();
        let err = service.login(&login_request()).await.unwrap_err();

        assert!(matches!(err, RemoteAuthError::Transport(_)));
    }
}
