use crate::tests::{TEST_SECRET, signed_token, unsigned_token};
use crate::{DecodeError, IdentityResolver, JwtVerifier, ResolutionError, ResolveOptions};

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use http::StatusCode;
use lh_core::{IssuedVia, ManualClock, Role};
use serde_json::json;

const NOW_SECS: i64 = 1_800_000_000;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.timestamp_opt(NOW_SECS, 0).unwrap()))
}

fn resolver() -> IdentityResolver {
    IdentityResolver::new(clock())
}

fn verifying_resolver() -> IdentityResolver {
    IdentityResolver::new(clock()).with_verifier(JwtVerifier::with_hs256(TEST_SECRET))
}

// =========================================================================
// Missing / malformed credentials
// =========================================================================

#[test]
fn given_no_header_when_resolved_then_missing_credential_401() {
    let err = resolver().resolve(None, &ResolveOptions::default()).unwrap_err();

    assert!(matches!(err, ResolutionError::MissingCredential { .. }));
    assert_eq!(err.status_hint(), StatusCode::UNAUTHORIZED);
}

#[test]
fn given_empty_header_when_resolved_then_missing_credential() {
    let err = resolver()
        .resolve(Some(""), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::MissingCredential { .. }));
}

#[test]
fn given_bearer_only_header_when_resolved_then_missing_credential() {
    let err = resolver()
        .resolve(Some("Bearer   "), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::MissingCredential { .. }));
}

#[test]
fn given_malformed_simplified_when_resolved_then_decode_error_401() {
    let err = resolver()
        .resolve(Some("Bearer u-1:jane"), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ResolutionError::Decode {
            source: DecodeError::MalformedSimplified { .. },
            ..
        }
    ));
    assert_eq!(err.status_hint(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.error_code(), "MALFORMED_SIMPLIFIED_TOKEN");
}

// =========================================================================
// Successful resolution
// =========================================================================

#[test]
fn given_simplified_header_when_resolved_then_identity_unchanged_from_codec() {
    let identity = resolver()
        .resolve(Some("Bearer u-1:jane:supervisor"), &ResolveOptions::default())
        .unwrap();

    assert_eq!(identity.user_id, "u-1");
    assert_eq!(identity.role, Role::Supervisor);
    assert_eq!(identity.issued_via, IssuedVia::Simplified);
}

#[test]
fn given_same_header_twice_when_resolved_then_same_identity() {
    let resolver = resolver();
    let opts = ResolveOptions::default();

    let first = resolver.resolve(Some("u-1:jane:user"), &opts).unwrap();
    let second = resolver.resolve(Some("u-1:jane:user"), &opts).unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_header_when_resolving_session_then_credential_has_no_prefix() {
    let session = resolver()
        .resolve_session(Some("Bearer u-1:jane:user"), &ResolveOptions::default())
        .unwrap();

    assert_eq!(session.credential, "u-1:jane:user");
    assert_eq!(session.user_id(), "u-1");
}

// =========================================================================
// JWT signature and expiry
// =========================================================================

#[test]
fn given_signed_jwt_and_verifier_when_resolved_then_ok() {
    let token = signed_token(
        &json!({ "userId": "u-9", "role": "admin", "exp": NOW_SECS + 3600 }),
        TEST_SECRET,
    );

    let identity = verifying_resolver()
        .resolve(Some(&format!("Bearer {}", token)), &ResolveOptions::default())
        .unwrap();

    assert_eq!(identity.user_id, "u-9");
    assert_eq!(identity.role, Role::Admin);
    assert_eq!(identity.issued_via, IssuedVia::Jwt);
}

#[test]
fn given_bad_signature_and_verifier_when_resolved_then_invalid_signature_401() {
    let token = unsigned_token(&json!({ "userId": "u-9", "exp": NOW_SECS + 3600 }));

    let err = verifying_resolver()
        .resolve(Some(&token), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::InvalidSignature { .. }));
    assert_eq!(err.status_hint(), StatusCode::UNAUTHORIZED);
}

#[test]
fn given_unsigned_jwt_and_no_verifier_when_resolved_then_accepted_structurally() {
    let token = unsigned_token(&json!({ "userId": "u-9" }));

    let identity = resolver()
        .resolve(Some(&token), &ResolveOptions::default())
        .unwrap();

    assert_eq!(identity.user_id, "u-9");
}

#[test]
fn given_expired_jwt_when_resolved_then_expired_credential_401() {
    let token = signed_token(
        &json!({ "userId": "u-9", "exp": NOW_SECS - 60 }),
        TEST_SECRET,
    );

    let err = verifying_resolver()
        .resolve(Some(&token), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::ExpiredCredential { .. }));
    assert_eq!(err.status_hint(), StatusCode::UNAUTHORIZED);
}

#[test]
fn given_recently_expired_jwt_within_leeway_when_resolved_then_ok() {
    let token = signed_token(
        &json!({ "userId": "u-9", "exp": NOW_SECS - 10 }),
        TEST_SECRET,
    );

    let result = verifying_resolver()
        .with_leeway_secs(30)
        .resolve(Some(&token), &ResolveOptions::default());

    assert!(result.is_ok());
}

#[test]
fn given_clock_moves_past_expiry_when_resolved_again_then_expired() {
    let clock = clock();
    let resolver = IdentityResolver::new(clock.clone());
    let token = unsigned_token(&json!({ "userId": "u-9", "exp": NOW_SECS + 60 }));

    assert!(resolver.resolve(Some(&token), &ResolveOptions::default()).is_ok());

    clock.advance(Duration::seconds(120));
    let err = resolver
        .resolve(Some(&token), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::ExpiredCredential { .. }));
}

// =========================================================================
// Roles
// =========================================================================

#[test]
fn given_user_when_admin_required_then_insufficient_role_403() {
    let err = resolver()
        .resolve(Some("u-1:jane:user"), &ResolveOptions::require(Role::Admin))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolutionError::InsufficientRole {
            required: Role::Admin,
            actual: Role::User,
            ..
        }
    ));
    assert_eq!(err.status_hint(), StatusCode::FORBIDDEN);
}

#[test]
fn given_admin_when_supervisor_required_then_ok() {
    let result = resolver().resolve(
        Some("u-1:root:admin"),
        &ResolveOptions::require(Role::Supervisor),
    );

    assert!(result.is_ok());
}

#[test]
fn given_supervisor_when_supervisor_required_then_ok() {
    let result = resolver().resolve(
        Some("u-1:sam:supervisor"),
        &ResolveOptions::require(Role::Supervisor),
    );

    assert!(result.is_ok());
}

// =========================================================================
// Dev fallback
// =========================================================================

#[test]
fn given_dev_fallback_when_allowed_then_resolves() {
    let identity = resolver()
        .resolve(Some("dev-fallback-jane"), &ResolveOptions::default())
        .unwrap();

    assert_eq!(identity.user_id, "jane-dev-id");
    assert_eq!(identity.role, Role::User);
}

#[test]
fn given_dev_fallback_when_disabled_then_rejected() {
    let err = resolver()
        .with_dev_fallback(false)
        .resolve(Some("dev-fallback"), &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(err, ResolutionError::DevFallbackDisabled { .. }));
    assert_eq!(err.status_hint(), StatusCode::UNAUTHORIZED);
}
