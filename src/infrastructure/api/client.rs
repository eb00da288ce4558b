//! CuraMetric REST API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    CreateUserRequest, GoogleLoginResponse, ListResponse, TokenBody, TokenRequest, TokenResponse,
    error_message,
};
use crate::domain::entities::{
    AuthToken, Patient, PatientId, User, Wound, WoundCare, WoundCareId, WoundId,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    AuthPort, ClinicalDataPort, Credentials, NewAccount, NewPatient, NewWound, NewWoundCare,
    WoundCareFilter,
};

const USER_AGENT: &str = concat!("curametric/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless client for the CuraMetric backend.
///
/// Every call is a single request; nothing is retried.
#[derive(Clone)]
pub struct CurametricClient {
    client: Client,
    base_url: String,
}

impl CurametricClient {
    /// Creates client for `base_url` with the default timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates client with a custom request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(request: RequestBuilder, token: Option<&AuthToken>) -> RequestBuilder {
        match token {
            Some(token) => request.header(header::AUTHORIZATION, token.bearer()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach CuraMetric backend");
            if e.is_timeout() {
                ApiError::network("request timed out")
            } else if e.is_connect() {
                ApiError::network("failed to connect to the server")
            } else {
                ApiError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error_response(status, response).await)
        }
    }

    async fn handle_error_response(status: StatusCode, response: Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
        debug!(%status, %message, "Backend returned an error");

        match status {
            StatusCode::UNAUTHORIZED => ApiError::unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            _ => ApiError::server(status.as_u16(), message),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(format!("failed to read response: {e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Failed to parse backend response");
            ApiError::malformed(e.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let request = Self::authorized(self.client.get(self.url(path)), Some(token)).query(query);
        Self::decode(self.send(request).await?).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>, ApiError> {
        self.get_json::<ListResponse<T>>(path, token, query)
            .await
            .map(ListResponse::into_vec)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = Self::authorized(self.client.post(self.url(path)), token).json(body);
        Self::decode(self.send(request).await?).await
    }

    fn parse_token(raw: String) -> Result<AuthToken, ApiError> {
        AuthToken::new(raw).ok_or_else(|| ApiError::malformed("server returned an invalid token"))
    }
}

#[async_trait]
impl AuthPort for CurametricClient {
    async fn obtain_token(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        debug!(email = %credentials.email, "Requesting access token");
        let body = TokenRequest {
            username: &credentials.email,
            password: credentials.password.as_str(),
        };
        let response: TokenResponse = self.post_json("token/", None, &body).await?;
        Self::parse_token(response.access)
    }

    async fn exchange_google_token(&self, id_token: &str) -> Result<AuthToken, ApiError> {
        debug!("Exchanging Google ID token");
        let result: Result<GoogleLoginResponse, ApiError> = self
            .post_json("google-login/", None, &TokenBody { token: id_token })
            .await;
        match result {
            Ok(response) => Self::parse_token(response.jwt),
            Err(ApiError::Server { status: 400, message }) => Err(ApiError::unauthorized(message)),
            Err(e) => Err(e),
        }
    }

    async fn verify_token(&self, token: &AuthToken) -> Result<(), ApiError> {
        debug!(token = %token, "Verifying token");
        let request = self
            .client
            .post(self.url("token/verify/"))
            .json(&TokenBody {
                token: token.as_str(),
            });
        self.send(request).await.map(|_| ())
    }

    async fn fetch_current_user(&self, token: &AuthToken) -> Result<User, ApiError> {
        self.get_json("users/me/", token, &[]).await
    }

    async fn create_user(&self, account: &NewAccount) -> Result<(), ApiError> {
        let email = account.credentials.email.as_str();
        let body = CreateUserRequest {
            username: email,
            email,
            password: account.credentials.password.as_str(),
            first_name: &account.first_name,
            last_name: &account.last_name,
        };
        let request = self.client.post(self.url("create_user/")).json(&body);
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl ClinicalDataPort for CurametricClient {
    async fn list_patients(&self, token: &AuthToken) -> Result<Vec<Patient>, ApiError> {
        self.get_list("patients/", token, &[]).await
    }

    async fn get_patient(&self, token: &AuthToken, id: PatientId) -> Result<Patient, ApiError> {
        self.get_json(&format!("patients/{id}/"), token, &[]).await
    }

    async fn create_patient(
        &self,
        token: &AuthToken,
        patient: &NewPatient,
    ) -> Result<Patient, ApiError> {
        self.post_json("patients/", Some(token), patient).await
    }

    async fn list_wounds(
        &self,
        token: &AuthToken,
        patient: PatientId,
    ) -> Result<Vec<Wound>, ApiError> {
        let wounds: Vec<Wound> = self
            .get_list("wounds/", token, &[("patient", patient.to_string())])
            .await?;
        Ok(wounds.into_iter().filter(|w| w.patient() == patient).collect())
    }

    async fn get_wound(&self, token: &AuthToken, id: WoundId) -> Result<Wound, ApiError> {
        self.get_json(&format!("wounds/{id}/"), token, &[]).await
    }

    async fn create_wound(&self, token: &AuthToken, wound: &NewWound) -> Result<Wound, ApiError> {
        self.post_json("wounds/", Some(token), wound).await
    }

    async fn list_wound_cares(
        &self,
        token: &AuthToken,
        filter: WoundCareFilter,
    ) -> Result<Vec<WoundCare>, ApiError> {
        self.get_list("woundcares/", token, &filter.query_pairs()).await
    }

    async fn get_wound_care(
        &self,
        token: &AuthToken,
        id: WoundCareId,
    ) -> Result<WoundCare, ApiError> {
        self.get_json(&format!("woundcares/{id}/"), token, &[]).await
    }

    async fn create_wound_care(
        &self,
        token: &AuthToken,
        care: &NewWoundCare,
    ) -> Result<WoundCare, ApiError> {
        self.post_json("woundcares/", Some(token), care).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use crate::domain::entities::UserId;

    /// Serves one canned `(status, body)` per connection and returns the raw requests.
    async fn stub_server(
        responses: Vec<(u16, impl Into<String>)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let responses: Vec<(u16, String)> = responses
            .into_iter()
            .map(|(status, body)| (status, body.into()))
            .collect();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });
        (format!("http://{address}"), handle)
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&buffer).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buffer).to_string()
    }

    fn token() -> AuthToken {
        AuthToken::new_unchecked("aaa.bbb.ccc")
    }

    const PATIENT: &str = r#"{"id": 4, "first_name": "Juan", "last_name": "Soto", "rut": "12.345.678-5",
        "birth_date": "1950-03-14", "chronic_diseases": ["Obesidad"], "predispositions": []}"#;

    #[test]
    fn test_client_creation() {
        let client = CurametricClient::new("http://localhost:8000/");
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_obtain_token_posts_email_as_username() {
        let (base, server) = stub_server(vec![(200, r#"{"access": "h.p.s", "refresh": "r.r.r"}"#)]).await;
        let client = CurametricClient::new(base).unwrap();

        let token = client
            .obtain_token(&Credentials::new("ana@clinic.cl", "s3cret"))
            .await
            .unwrap();

        assert_eq!(token.as_str(), "h.p.s");
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/token/ "));
        assert!(requests[0].contains(r#""username":"ana@clinic.cl""#));
        assert!(!requests[0].to_lowercase().contains("authorization"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_map_to_unauthorized() {
        let (base, _server) = stub_server(vec![(
            401,
            r#"{"detail": "No active account found with the given credentials"}"#,
        )])
        .await;
        let client = CurametricClient::new(base).unwrap();

        let error = client
            .obtain_token(&Credentials::new("ana@clinic.cl", "bad"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::Unauthorized { ref message } if message.contains("No active account")));
    }

    #[tokio::test]
    async fn test_verify_rejection() {
        let (base, server) = stub_server(vec![(401, r#"{"detail": "Token is invalid or expired"}"#)]).await;
        let client = CurametricClient::new(base).unwrap();

        let error = client.verify_token(&token()).await.unwrap_err();

        assert!(error.requires_logout());
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/token/verify/ "));
        assert!(requests[0].contains(r#"{"token":"aaa.bbb.ccc"}"#));
    }

    #[tokio::test]
    async fn test_google_bad_request_is_unauthorized() {
        let (base, _server) = stub_server(vec![(400, r#"{"error": "Token inválido"}"#)]).await;
        let client = CurametricClient::new(base).unwrap();

        let error = client.exchange_google_token("id-token").await.unwrap_err();

        assert!(matches!(error, ApiError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_list_patients_sends_bearer_and_accepts_pagination() {
        let body = format!(r#"{{"count": 1, "results": [{PATIENT}]}}"#);
        let (base, server) = stub_server(vec![(200, body)]).await;
        let client = CurametricClient::new(base).unwrap();

        let patients = client.list_patients(&token()).await.unwrap();

        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].rut(), "12.345.678-5");
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /api/patients/ "));
        assert!(
            requests[0]
                .to_lowercase()
                .contains("authorization: bearer aaa.bbb.ccc")
        );
    }

    #[tokio::test]
    async fn test_wound_cares_query_string() {
        let (base, server) = stub_server(vec![(200, "[]")]).await;
        let client = CurametricClient::new(base).unwrap();

        let entries = client
            .list_wound_cares(&token(), WoundCareFilter::for_wound(PatientId(4), WoundId(9)))
            .await
            .unwrap();

        assert!(entries.is_empty());
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /api/woundcares/?patient=4&wound=9 "));
    }

    #[tokio::test]
    async fn test_create_patient_payload() {
        let (base, server) = stub_server(vec![(201, PATIENT)]).await;
        let client = CurametricClient::new(base).unwrap();
        let new_patient = NewPatient {
            first_name: "Juan".to_string(),
            last_name: "Soto".to_string(),
            rut: "12.345.678-5".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1950, 3, 14).unwrap(),
            chronic_diseases: vec!["Obesidad".to_string()],
            predispositions: Vec::new(),
            created_by: UserId(7),
            updated_by: UserId(7),
        };

        let created = client.create_patient(&token(), &new_patient).await.unwrap();

        assert_eq!(created.id(), PatientId(4));
        let requests = server.await.unwrap();
        assert!(requests[0].contains(r#""birth_date":"1950-03-14""#));
        assert!(requests[0].contains(r#""created_by":7"#));
    }

    #[tokio::test]
    async fn test_error_taxonomy() {
        let (base, _server) = stub_server(vec![
            (403, r#"{"detail": "You do not have permission"}"#),
            (500, "<html>oops</html>"),
            (200, "not json"),
        ])
        .await;
        let client = CurametricClient::new(base).unwrap();

        let forbidden = client.list_patients(&token()).await.unwrap_err();
        assert!(matches!(forbidden, ApiError::Forbidden { .. }));

        let server_error = client.list_patients(&token()).await.unwrap_err();
        assert!(matches!(server_error, ApiError::Server { status: 500, .. }));
        assert!(server_error.is_recoverable());

        let malformed = client.list_patients(&token()).await.unwrap_err();
        assert!(matches!(malformed, ApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let client = CurametricClient::new(format!("http://{address}")).unwrap();

        let error = client.list_patients(&token()).await.unwrap_err();

        assert!(error.is_network_error());
    }
}
