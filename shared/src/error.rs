use thiserror::Error;

/// Failures surfaced by the live demo widget. None of them are fatal to the
/// page; each ends up as a dismissible message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemoError {
    #[error("{0}")]
    InputNotReady(String),

    #[error("{0}")]
    NetworkOrServer(String),

    #[error("Unexpected response: {0}")]
    MalformedResult(String),
}

impl DemoError {
    pub fn camera_not_ready() -> Self {
        DemoError::InputNotReady("Camera not ready. Try again in a second.".into())
    }

    /// Builds the failure for a non-2xx reply, preferring the body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            DemoError::NetworkOrServer(format!("Server error: {} - request failed", status))
        } else {
            DemoError::NetworkOrServer(format!("Server error: {} - {}", status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_uses_body_when_present() {
        let e = DemoError::from_status(500, "model crashed\n");
        assert_eq!(e.to_string(), "Server error: 500 - model crashed");
    }

    #[test]
    fn status_error_falls_back_to_generic_text() {
        let e = DemoError::from_status(502, "  ");
        assert_eq!(e.to_string(), "Server error: 502 - request failed");
    }

    #[test]
    fn malformed_result_display() {
        let e = DemoError::MalformedResult("expected value at line 1".into());
        assert!(e.to_string().starts_with("Unexpected response"));
    }
}
