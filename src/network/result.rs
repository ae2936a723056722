use super::error::ApiError;
use serde::de::DeserializeOwned;

/// Status used when no HTTP response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Outcome of a single GET: status code and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub status: u16,
    pub body: String,
}

impl RequestResult {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A request that never got a response (connection refused, timeout, ...).
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::new(TRANSPORT_FAILURE_STATUS, message)
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE_STATUS
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Returns the result when the status is 200, an [`ApiError::Http`] otherwise.
    pub fn into_success(self) -> Result<Self, ApiError> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status,
                message: self.body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Count {
        count: u64,
    }

    #[test]
    fn test_json_parses_body() {
        let result = RequestResult::new(200, r#"{"count": 1234}"#);
        assert_eq!(result.json::<Count>().unwrap().count, 1234);
    }

    #[test]
    fn test_into_success_rejects_no_content() {
        let err = RequestResult::new(204, "").into_success().unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 204, .. }));
    }

    #[test]
    fn test_transport_failure_status() {
        assert!(RequestResult::transport_failure("refused").is_transport_failure());
        assert!(!RequestResult::new(500, "").is_transport_failure());
    }
}
