use crate::{JwtAlgorithm, ResolutionError, Result as ResolutionResult};

use std::collections::HashSet;
use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::Value;

/// Checks JWT signatures.
///
/// Only the signature and algorithm are checked here. Expiry is enforced by
/// the resolver against its own clock, so tokens without `exp` still verify.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
}

impl JwtVerifier {
    /// Verifier for HS256 (symmetric secret)
    pub fn with_hs256(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Self::signature_only(Algorithm::HS256),
            algorithm: Algorithm::HS256,
        }
    }

    /// Verifier for RS256 (asymmetric public key)
    #[track_caller]
    pub fn with_rs256(public_key_pem: &str) -> ResolutionResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
            ResolutionError::InvalidSignature {
                message: format!("Invalid RSA public key: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(Self {
            decoding_key,
            validation: Self::signature_only(Algorithm::RS256),
            algorithm: Algorithm::RS256,
        })
    }

    #[track_caller]
    pub fn from_algorithm(algorithm: &JwtAlgorithm) -> ResolutionResult<Self> {
        match algorithm {
            JwtAlgorithm::HS256 { secret } => Ok(Self::with_hs256(secret)),
            JwtAlgorithm::RS256 { public_key_pem } => Self::with_rs256(public_key_pem),
        }
    }

    fn signature_only(algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation
    }

    /// Verify the token's signature
    #[track_caller]
    pub fn verify(&self, token: &str) -> ResolutionResult<()> {
        decode::<Value>(token, &self.decoding_key, &self.validation)
            .map(|_| ())
            .map_err(|e| ResolutionError::InvalidSignature {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Get the algorithm being used (for logging/debugging)
    pub fn algorithm(&self) -> &str {
        match self.algorithm {
            Algorithm::HS256 => "HS256",
            Algorithm::RS256 => "RS256",
            _ => "unknown",
        }
    }
}
