use serde::Serialize;

use crate::analysis::RecordSet;
use crate::model::ID_SEPARATOR;

/// Category prefixes tried for bare dependency tokens when suffix matching
/// does not settle on a single id.
pub const DEFAULT_KNOWN_PREFIXES: &[&str] = &[
    "ecdsa",
    "mldsa65",
    "falcon",
    "falcon1024",
    "dilithium",
    "ethdilithium",
    "p256",
    "randao",
    "attestation",
    "das",
    "sig",
    "sigproto",
    "aa",
    "entropy",
    "da",
];

/// Outcome of resolving one dependency token, with the rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TokenResolution {
    /// Token is an existing id.
    Exact { id: String },
    /// Token is qualified (`a::b`) but not in the set; kept as an external reference.
    External { token: String },
    /// Exactly one id ends with `::<token>`.
    Suffix { id: String },
    /// Exactly one `<known prefix>::<token>` exists.
    Prefix { id: String },
    /// Several candidates matched; nothing is guessed.
    Ambiguous { token: String, candidates: Vec<String> },
    /// Nothing matched.
    Unknown { token: String },
}

impl TokenResolution {
    /// The id to follow, or the token unchanged when resolution failed.
    pub fn target(&self) -> &str {
        match self {
            TokenResolution::Exact { id }
            | TokenResolution::Suffix { id }
            | TokenResolution::Prefix { id } => id,
            TokenResolution::External { token }
            | TokenResolution::Ambiguous { token, .. }
            | TokenResolution::Unknown { token } => token,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            TokenResolution::Exact { .. }
                | TokenResolution::Suffix { .. }
                | TokenResolution::Prefix { .. }
        )
    }
}

/// Maps dependency tokens (full ids, bare bench names, aliases) onto ids of
/// a deduplicated [`RecordSet`].
#[derive(Debug, Clone)]
pub struct IdResolver<'a> {
    records: &'a RecordSet,
    known_prefixes: Vec<String>,
}

impl<'a> IdResolver<'a> {
    pub fn new(records: &'a RecordSet) -> Self {
        Self::with_prefixes(records, DEFAULT_KNOWN_PREFIXES.iter().map(|p| p.to_string()))
    }

    pub fn with_prefixes<I, S>(records: &'a RecordSet, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { records, known_prefixes: prefixes.into_iter().map(Into::into).collect() }
    }

    /// Resolve a token to an id, or return it unchanged.
    pub fn resolve(&self, token: &str) -> String {
        self.classify(token).target().to_string()
    }

    /// Resolve a token and report which rule fired.
    pub fn classify(&self, token: &str) -> TokenResolution {
        if self.records.contains(token) {
            return TokenResolution::Exact { id: token.to_string() };
        }
        if token.contains(ID_SEPARATOR) {
            return TokenResolution::External { token: token.to_string() };
        }

        let suffix = format!("{ID_SEPARATOR}{token}");
        let suffix_matches: Vec<String> =
            self.records.ids().filter(|id| id.ends_with(&suffix)).map(str::to_string).collect();
        if let [only] = suffix_matches.as_slice() {
            return TokenResolution::Suffix { id: only.clone() };
        }

        let mut prefix_matches: Vec<String> = self
            .known_prefixes
            .iter()
            .map(|prefix| format!("{prefix}{ID_SEPARATOR}{token}"))
            .filter(|candidate| self.records.contains(candidate))
            .collect();
        prefix_matches.sort();
        prefix_matches.dedup();
        if let [only] = prefix_matches.as_slice() {
            if suffix_matches.len() > 1 {
                tracing::warn!(
                    token,
                    chosen = %only,
                    dropped = ?suffix_matches,
                    "known prefix settled an ambiguous suffix match"
                );
            }
            return TokenResolution::Prefix { id: only.clone() };
        }

        let mut candidates = suffix_matches;
        candidates.extend(prefix_matches);
        candidates.sort();
        candidates.dedup();
        if candidates.is_empty() {
            TokenResolution::Unknown { token: token.to_string() }
        } else {
            tracing::warn!(token, ?candidates, "ambiguous dependency token left unresolved");
            TokenResolution::Ambiguous { token: token.to_string(), candidates }
        }
    }
}
