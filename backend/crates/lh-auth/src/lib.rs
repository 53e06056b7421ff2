pub mod credential;
pub mod error;
pub mod identity_resolver;
pub mod jwt_algorithm;
pub mod jwt_payload;
pub mod jwt_verifier;
pub mod token_codec;

pub use credential::Credential;
pub use error::{DecodeError, ResolutionError, Result};
pub use identity_resolver::{IdentityResolver, ResolveOptions};
pub use jwt_algorithm::JwtAlgorithm;
pub use jwt_payload::JwtPayload;
pub use jwt_verifier::JwtVerifier;
pub use token_codec::TokenCodec;

#[cfg(test)]
mod tests;
