//! Success-flag check applied to every decoded envelope.

use xui_domain::{ResponseEnvelope, XuiError};

/// Reject envelopes the panel marked as failed.
///
/// The panel's `msg` is passed through verbatim. Raw (binary) responses never
/// reach this function.
///
/// # Errors
/// Returns `XuiError::RemoteOperation` when `success` is false or missing.
pub fn validate_envelope(envelope: &ResponseEnvelope) -> Result<(), XuiError> {
    if envelope.success {
        return Ok(());
    }

    Err(XuiError::RemoteOperation { message: envelope.msg.clone() })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_passes_untouched() {
        let envelope = ResponseEnvelope::ok(json!([1, 2, 3]));
        assert!(validate_envelope(&envelope).is_ok());
        assert_eq!(envelope.obj, Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_failure_carries_panel_message() {
        let envelope = ResponseEnvelope::failed("Inbound not found");
        assert_eq!(
            validate_envelope(&envelope),
            Err(XuiError::RemoteOperation { message: "Inbound not found".into() })
        );
    }

    #[test]
    fn test_missing_success_flag_fails() {
        let envelope: ResponseEnvelope = serde_json::from_str(r#"{"obj":{}}"#).unwrap();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(XuiError::RemoteOperation { message }) if message.is_empty()
        ));
    }
}
