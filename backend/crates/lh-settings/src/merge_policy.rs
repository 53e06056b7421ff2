use lh_core::{PreferenceDocument, SourceTier};

/// Which candidate [`merge`] picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeWinner {
    Local,
    Remote,
    Defaults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub document: PreferenceDocument,
    pub winner: MergeWinner,
}

/// Pick the document to adopt at login.
///
/// The later `lastSaved` wins. The remote copy wins ties and any comparison
/// where either side lacks a timestamp. With neither candidate the result is
/// the built-in defaults owned by `user_id`.
pub fn merge(
    local: Option<PreferenceDocument>,
    remote: Option<PreferenceDocument>,
    user_id: &str,
) -> Merged {
    match (local, remote) {
        (None, None) => {
            let mut document = PreferenceDocument::defaults().with_source(SourceTier::BuiltIn);
            document.metadata.user_id = Some(user_id.to_string());
            Merged {
                document,
                winner: MergeWinner::Defaults,
            }
        }
        (Some(local), None) => Merged {
            document: local,
            winner: MergeWinner::Local,
        },
        (None, Some(remote)) => Merged {
            document: remote,
            winner: MergeWinner::Remote,
        },
        (Some(local), Some(remote)) => match (local.last_saved(), remote.last_saved()) {
            (Some(local_saved), Some(remote_saved)) if local_saved > remote_saved => Merged {
                document: local,
                winner: MergeWinner::Local,
            },
            _ => Merged {
                document: remote,
                winner: MergeWinner::Remote,
            },
        },
    }
}
