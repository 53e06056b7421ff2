use crate::{Identity, IssuedVia, Role};

use chrono::{Duration, TimeZone, Utc};

fn identity_expiring_at(secs: i64) -> Identity {
    Identity {
        user_id: "u-1".to_string(),
        username: Some("jane".to_string()),
        role: Role::User,
        issued_via: IssuedVia::Jwt,
        expires_at: Some(Utc.timestamp_opt(secs, 0).unwrap()),
    }
}

#[test]
fn given_expiry_in_past_when_checked_then_expired() {
    let identity = identity_expiring_at(1_000);
    let now = Utc.timestamp_opt(2_000, 0).unwrap();

    assert!(identity.is_expired_at(now, Duration::zero()));
}

#[test]
fn given_expiry_within_leeway_when_checked_then_not_expired() {
    let identity = identity_expiring_at(1_000);
    let now = Utc.timestamp_opt(1_020, 0).unwrap();

    assert!(!identity.is_expired_at(now, Duration::seconds(30)));
}

#[test]
fn given_no_expiry_when_checked_then_never_expired() {
    let mut identity = identity_expiring_at(0);
    identity.expires_at = None;

    assert!(!identity.is_expired_at(Utc::now(), Duration::zero()));
}

#[test]
fn test_identity_serializes_camel_case() {
    let identity = identity_expiring_at(1_000);

    let json = serde_json::to_value(&identity).unwrap();

    assert_eq!(json["userId"], "u-1");
    assert_eq!(json["issuedVia"], "jwt");
    assert_eq!(json["role"], "user");
}
