use serde::{Deserialize, Serialize};

/// Which tier produced a preference document (its provenance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Local,
    Server,
    /// Built-in defaults
    #[default]
    #[serde(rename = "default")]
    BuiltIn,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Server => "server",
            Self::BuiltIn => "default",
        }
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
