use thiserror::Error;

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PortalError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("dom error: {0}")]
    Dom(String),
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_status_and_body() {
        let err = PortalError::Http {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: PortalError = serde_json::from_str::<i64>("nope").unwrap_err().into();
        assert!(matches!(err, PortalError::Decode(_)));
    }
}
