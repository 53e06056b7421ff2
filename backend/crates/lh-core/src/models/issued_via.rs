use serde::{Deserialize, Serialize};

/// Which credential encoding produced an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssuedVia {
    Simplified,
    Jwt,
    DevFallback,
}

impl IssuedVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simplified => "simplified",
            Self::Jwt => "jwt",
            Self::DevFallback => "devFallback",
        }
    }
}

impl std::fmt::Display for IssuedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
