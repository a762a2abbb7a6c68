use serde::{Deserialize, Serialize};

/// A single object the remote service refused to remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFailure {
    /// Key of the object that was not removed.
    pub key: String,
    /// Error code reported by the remote service.
    pub code: String,
    /// Error message reported by the remote service.
    pub message: String,
}

impl DeleteFailure {
    /// Creates a new DeleteFailure.
    pub fn new(
        key: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.key, self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_failure_display_and_json() {
        let failure = DeleteFailure::new("a.jpg", "AccessDenied", "Access Denied.");
        assert_eq!(failure.to_string(), "a.jpg: Access Denied. (AccessDenied)");

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "a.jpg",
                "code": "AccessDenied",
                "message": "Access Denied.",
            })
        );
    }
}
