use crate::{Credential, DecodeError, JwtVerifier, ResolutionError, Result as ResolutionResult, TokenCodec};

use std::panic::Location;
use std::sync::Arc;

use chrono::Duration;
use error_location::ErrorLocation;
use lh_core::{Clock, Identity, Role, Session};
use log::{debug, warn};

/// Per-call constraints for [`IdentityResolver::resolve`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub require_role: Option<Role>,
}

impl ResolveOptions {
    pub fn require(role: Role) -> Self {
        Self {
            require_role: Some(role),
        }
    }
}

/// Turns an `Authorization` header value into an authenticated [`Identity`].
///
/// Resolution is a pure function of the header, the configured keys and the
/// clock, so it is safe to retry.
pub struct IdentityResolver {
    verifier: Option<JwtVerifier>,
    allow_dev_fallback: bool,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl IdentityResolver {
    /// Resolver without JWT verification, accepting dev-fallback credentials
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            verifier: None,
            allow_dev_fallback: true,
            leeway: Duration::zero(),
            clock,
        }
    }

    pub fn with_verifier(mut self, verifier: JwtVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_dev_fallback(mut self, allow: bool) -> Self {
        self.allow_dev_fallback = allow;
        self
    }

    /// Clock skew tolerated when checking expiry
    pub fn with_leeway_secs(mut self, secs: u64) -> Self {
        self.leeway = Duration::seconds(secs as i64);
        self
    }

    #[track_caller]
    pub fn resolve(
        &self,
        header: Option<&str>,
        opts: &ResolveOptions,
    ) -> ResolutionResult<Identity> {
        self.resolve_credential(header, opts)
            .map(|(identity, _)| identity)
    }

    /// Like [`resolve`](Self::resolve), keeping the bearer credential so the
    /// session can authenticate remote calls.
    #[track_caller]
    pub fn resolve_session(
        &self,
        header: Option<&str>,
        opts: &ResolveOptions,
    ) -> ResolutionResult<Session> {
        self.resolve_credential(header, opts)
            .map(|(identity, credential)| Session::new(identity, credential))
    }

    #[track_caller]
    fn resolve_credential(
        &self,
        header: Option<&str>,
        opts: &ResolveOptions,
    ) -> ResolutionResult<(Identity, String)> {
        let raw = header.map(TokenCodec::strip_bearer).unwrap_or_default();

        let credential = TokenCodec::decode(raw).map_err(|source| match source {
            DecodeError::Empty { .. } => ResolutionError::MissingCredential {
                location: ErrorLocation::from(Location::caller()),
            },
            source => {
                debug!("Credential rejected: {}", source.error_code());
                ResolutionError::Decode {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        })?;

        match &credential {
            Credential::Jwt { token, .. } => match &self.verifier {
                Some(verifier) => verifier.verify(token)?,
                None => warn!("No JWT verification key configured; accepting JWT without signature check"),
            },
            Credential::DevFallback { username } if !self.allow_dev_fallback => {
                warn!("Rejected dev-fallback credential for '{}'", username);
                return Err(ResolutionError::DevFallbackDisabled {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            _ => {}
        }

        let identity = credential.identity();

        if identity.is_expired_at(self.clock.now(), self.leeway)
            && let Some(expired_at) = identity.expires_at
        {
            return Err(ResolutionError::ExpiredCredential {
                expired_at,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(required) = opts.require_role
            && !identity.satisfies(required)
        {
            return Err(ResolutionError::InsufficientRole {
                required,
                actual: identity.role,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(
            "Resolved user {} ({}) via {}",
            identity.user_id, identity.role, identity.issued_via
        );

        Ok((identity, raw.to_string()))
    }
}
