use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Decode and verify a credential, printing the identity
    Resolve {
        /// Raw credential or `Authorization` header value
        credential: String,

        /// Fail unless the identity has at least this role (user, supervisor, admin)
        #[arg(long)]
        require_role: Option<String>,
    },

    /// Sign in and reconcile local and remote preferences
    Login {
        /// Raw credential or `Authorization` header value
        credential: String,
    },

    /// Print the preferences currently in effect
    Show,

    /// Change one preference
    Set {
        /// Setting name as stored (e.g. fontSize)
        key: String,

        /// JSON value; anything that is not valid JSON is taken as a string
        value: String,
    },

    /// Sign out, keeping preferences as the anonymous defaults
    Logout,
}
