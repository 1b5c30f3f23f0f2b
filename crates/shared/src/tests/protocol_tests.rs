use super::*;
use crate::domain::EntryId;
use crate::error::ApiError;

#[test]
fn history_envelope_decodes_server_entries_in_order() {
    let raw = r#"{
        "success": true,
        "data": [
            {"id": 7, "valueA": 30, "valueB": 30, "valueC": 40, "recordedAt": "2025-06-01T10:00:00.000Z", "userId": 3},
            {"id": 4, "valueA": 20.5, "valueB": 40, "valueC": 39.5, "recordedAt": "2025-05-30T08:15:00Z"}
        ]
    }"#;

    let envelope: HistoryResponse = serde_json::from_str(raw).expect("decode");
    assert!(envelope.success);
    let entries = envelope.data.expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, EntryId(7));
    assert_eq!(entries[0].triple(), ValueTriple::new(30.0, 30.0, 40.0));
    assert_eq!(entries[1].id, EntryId(4));
    assert_eq!(entries[1].value_a, 20.5);
}

#[test]
fn create_request_uses_camel_case_value_names() {
    let body = CreateEntryRequest::from(ValueTriple::new(30.0, 30.0, 40.0));
    let json = serde_json::to_value(&body).expect("encode");
    assert_eq!(
        json,
        serde_json::json!({"valueA": 30.0, "valueB": 30.0, "valueC": 40.0})
    );
}

#[test]
fn failure_envelope_without_data_decodes() {
    let envelope: CreateEntryResponse =
        serde_json::from_str(r#"{"success": false, "message": "Invalid token"}"#).expect("decode");
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.message.as_deref(), Some("Invalid token"));
}

#[test]
fn login_payload_carries_user_and_token() {
    let raw = r#"{"success": true, "message": "Login successful", "data": {"user": {"name": "Ada", "code": "1234"}, "token": "jwt"}}"#;
    let envelope: ApiEnvelope<LoginResponse> = serde_json::from_str(raw).expect("decode");
    let data = envelope.data.expect("data");
    assert_eq!(data.user.name, "Ada");
    assert_eq!(data.token, "jwt");
}

#[test]
fn api_error_ignores_blank_messages() {
    let blank: ApiError = serde_json::from_str(r#"{"message": "   "}"#).expect("decode");
    assert_eq!(blank.message(), None);
    assert_eq!(ApiError::new("Code taken").message(), Some("Code taken"));
}

#[test]
fn login_envelope_without_data_decodes_for_any_payload_type() {
    let missing: ApiEnvelope<LoginResponse> =
        serde_json::from_str(r#"{"success": false, "message": "Invalid code"}"#).expect("decode");
    assert!(missing.data.is_none());

    let null: ApiEnvelope<LoginResponse> =
        serde_json::from_str(r#"{"success": false, "data": null}"#).expect("decode");
    assert!(null.data.is_none());
    assert!(null.message.is_none());
}
