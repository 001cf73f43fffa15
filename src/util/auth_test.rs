use super::*;
use crate::net::types::SenderRole;

#[test]
fn pick_token_prefers_first_non_blank() {
    assert_eq!(
        pick_token([Some("  ".to_owned()), Some("fallback".to_owned())]),
        Some("fallback".to_owned())
    );
    assert_eq!(pick_token([Some("primary".to_owned()), Some("fallback".to_owned())]), Some("primary".to_owned()));
    assert_eq!(pick_token([None, None]), None);
}

#[test]
fn pick_token_trims_whitespace() {
    assert_eq!(pick_token([Some(" t1 ".to_owned())]), Some("t1".to_owned()));
}

#[test]
fn parse_stored_user_reads_login_payload() {
    let user = parse_stored_user(r#"{"id":7,"name":"Ana","role":"CLIENT","email":"ana@example.test"}"#)
        .expect("stored user");
    assert_eq!(user.id, 7);
    assert_eq!(user.role, SenderRole::Client);
}

#[test]
fn parse_stored_user_rejects_garbage() {
    assert_eq!(parse_stored_user("null"), None);
    assert_eq!(parse_stored_user("{"), None);
}

#[test]
fn token_keys_check_token_first() {
    assert_eq!(TOKEN_KEYS, ["token", "access_token"]);
}
