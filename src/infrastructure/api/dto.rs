use serde::{Deserialize, Serialize};

/// Body of `POST /api/token/`. The backend keys accounts by email as username.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
}

/// Body shared by `POST /api/token/verify/` and `POST /api/google-login/`.
#[derive(Serialize)]
pub struct TokenBody<'a> {
    pub token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginResponse {
    pub jwt: String,
}

#[derive(Serialize)]
pub struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// List endpoints answer either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paginated { results: items } => items,
        }
    }
}

/// Extracts a readable message from an error body.
///
/// Looks at `detail`, `message` and `error`, then at the first field error of
/// a validation response such as `{"rut": ["already exists"]}`.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    for key in ["detail", "message", "error"] {
        if let Some(text) = object.get(key).and_then(serde_json::Value::as_str) {
            return Some(text.to_string());
        }
    }
    object.iter().find_map(|(field, value)| {
        let text = match value {
            serde_json::Value::String(text) => Some(text.as_str()),
            serde_json::Value::Array(items) => items.first().and_then(serde_json::Value::as_str),
            _ => None,
        }?;
        Some(format!("{field}: {text}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_shapes() {
        let plain: ListResponse<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(plain.into_vec(), vec![1, 2]);

        let paginated: ListResponse<u32> =
            serde_json::from_str(r#"{"count": 1, "next": null, "results": [3]}"#).unwrap();
        assert_eq!(paginated.into_vec(), vec![3]);
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            error_message(r#"{"detail": "Given token not valid"}"#).as_deref(),
            Some("Given token not valid")
        );
        assert_eq!(
            error_message(r#"{"error": "Token inválido"}"#).as_deref(),
            Some("Token inválido")
        );
        assert_eq!(
            error_message(r#"{"username": ["A user with that username already exists."]}"#)
                .as_deref(),
            Some("username: A user with that username already exists.")
        );
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
