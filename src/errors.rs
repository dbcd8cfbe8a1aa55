use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};
use serde_json::json;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum BoothError {
    #[display(fmt = "event name '{}' is already taken", _0)]
    DuplicateName(#[error(not(source))] String),

    #[display(fmt = "user '{}' already exists", _0)]
    DuplicateUser(#[error(not(source))] String),

    #[display(fmt = "{} not found", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "invalid password")]
    InvalidCredentials,

    #[display(fmt = "user doesn't exist")]
    UserNotFound,

    #[display(fmt = "too many failed login attempts, try again later")]
    TooManyAttempts,

    #[display(fmt = "image upload failed: {}", _0)]
    UploadFailure(#[error(not(source))] String),

    #[display(fmt = "bad request: {}", _0)]
    BadClientData(#[error(not(source))] String),

    #[display(fmt = "store error: {}", _0)]
    Store(#[error(not(source))] String),

    #[display(fmt = "service unavailable: {}", _0)]
    Unavailable(#[error(not(source))] String),
}

impl BoothError {
    /// Stable machine-readable kind, used as `error.code` in responses.
    pub fn code(&self) -> &'static str {
        match self {
            BoothError::DuplicateName(_) => "duplicate_name",
            BoothError::DuplicateUser(_) => "duplicate_user",
            BoothError::NotFound(_) => "not_found",
            BoothError::InvalidCredentials => "invalid_credentials",
            BoothError::UserNotFound => "user_not_found",
            BoothError::TooManyAttempts => "too_many_attempts",
            BoothError::UploadFailure(_) => "upload_failure",
            BoothError::BadClientData(_) => "bad_request",
            BoothError::Store(_) => "store_error",
            BoothError::Unavailable(_) => "unavailable",
        }
    }

    pub fn not_found_event() -> Self {
        BoothError::NotFound("event".to_string())
    }

    /// The variant's payload, sent as `error.detail`. Store errors keep theirs private.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BoothError::DuplicateName(v)
            | BoothError::DuplicateUser(v)
            | BoothError::NotFound(v)
            | BoothError::UploadFailure(v)
            | BoothError::BadClientData(v)
            | BoothError::Unavailable(v) => Some(v),
            BoothError::InvalidCredentials
            | BoothError::UserNotFound
            | BoothError::TooManyAttempts
            | BoothError::Store(_) => None,
        }
    }

    /// Rebuilds an error from a response envelope's `code` and `detail`.
    pub fn from_wire(code: &str, detail: Option<String>) -> Self {
        let message = detail.unwrap_or_default();
        match code {
            "duplicate_name" => BoothError::DuplicateName(message),
            "duplicate_user" => BoothError::DuplicateUser(message),
            "not_found" => BoothError::NotFound(message),
            "invalid_credentials" => BoothError::InvalidCredentials,
            "user_not_found" => BoothError::UserNotFound,
            "too_many_attempts" => BoothError::TooManyAttempts,
            "upload_failure" => BoothError::UploadFailure(message),
            "bad_request" => BoothError::BadClientData(message),
            "unavailable" => BoothError::Unavailable(message),
            _ => BoothError::Store(message),
        }
    }
}

impl From<sqlx::Error> for BoothError {
    fn from(err: sqlx::Error) -> Self {
        BoothError::Store(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for BoothError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        BoothError::Store(err.to_string())
    }
}

impl ResponseError for BoothError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            BoothError::Store(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        let mut body = json!({
            "code": self.code(),
            "message": message,
        });
        if let Some(detail) = self.detail() {
            body["detail"] = json!(detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "error": body,
        }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            BoothError::DuplicateName(_) => StatusCode::CONFLICT,
            BoothError::DuplicateUser(_) => StatusCode::CONFLICT,
            BoothError::NotFound(_) => StatusCode::NOT_FOUND,
            BoothError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            BoothError::UserNotFound => StatusCode::NOT_FOUND,
            BoothError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            BoothError::UploadFailure(_) => StatusCode::BAD_GATEWAY,
            BoothError::BadClientData(_) => StatusCode::BAD_REQUEST,
            BoothError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BoothError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(BoothError::DuplicateName("Gala".into()), StatusCode::CONFLICT, "duplicate_name")]
    #[case(BoothError::NotFound("event".into()), StatusCode::NOT_FOUND, "not_found")]
    #[case(BoothError::InvalidCredentials, StatusCode::UNAUTHORIZED, "invalid_credentials")]
    #[case(BoothError::UserNotFound, StatusCode::NOT_FOUND, "user_not_found")]
    #[case(BoothError::TooManyAttempts, StatusCode::TOO_MANY_REQUESTS, "too_many_attempts")]
    #[case(BoothError::Store("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "store_error")]
    fn maps_kinds_to_status_and_code(
        #[case] err: BoothError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.code(), code);
    }

    #[actix_web::test]
    async fn store_details_are_redacted() {
        let resp = BoothError::Store("password column missing".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], "store_error");
        assert_eq!(value["error"]["message"], "internal error");
        assert!(value["error"].get("detail").is_none());
    }

    #[rstest]
    #[case(BoothError::DuplicateName("Gala".into()))]
    #[case(BoothError::NotFound("event".into()))]
    #[case(BoothError::InvalidCredentials)]
    #[case(BoothError::TooManyAttempts)]
    fn wire_form_rebuilds_the_variant(#[case] err: BoothError) {
        let rebuilt = BoothError::from_wire(err.code(), err.detail().map(str::to_string));
        assert_eq!(rebuilt, err);
    }
}
