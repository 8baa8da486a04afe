//! Opener and closer signature tables.
//!
//! Classification is two-tier: an exact `qualifier.Method` lookup in the
//! known table first, then a lifecycle-substring fallback on the method name
//! alone. Closers are matched exactly, ignoring case, on the method name.

use std::collections::{BTreeMap, BTreeSet};

use leaklint_core::syntax::SelectorCall;

const KNOWN_OPENERS: &[(&str, &[&str])] = &[
    (
        "os",
        &["Open", "OpenFile", "Create", "NewFile", "ReadFile", "WriteFile"],
    ),
    ("net", &["Dial", "DialTimeout", "Listen", "ListenPacket"]),
    ("sql", &["Open"]),
    ("bufio", &["NewReader", "NewWriter", "NewReadWriter"]),
    ("gzip", &["NewReader", "NewWriter"]),
    ("zip", &["OpenReader"]),
];

const GENERIC_OPENERS: &[&str] = &["init", "open", "start", "dial"];

const CLOSERS: &[&str] = &[
    "close",
    "stop",
    "shutdown",
    "terminate",
    "abort",
    "exit",
    "destroy",
    "finish",
];

/// How a call was recognised as an opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenerMatch {
    /// Exact hit in the `qualifier -> methods` table.
    Known,
    /// Method name contains a generic lifecycle fragment.
    Generic,
}

/// Immutable signature tables shared by every file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTables {
    known: BTreeMap<String, BTreeSet<String>>,
    generic: Vec<String>,
    closers: BTreeSet<String>,
}

impl Default for PatternTables {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternTables {
    /// Creates the default tables.
    #[must_use]
    pub fn new() -> Self {
        let known = KNOWN_OPENERS
            .iter()
            .map(|(qualifier, methods)| {
                (
                    (*qualifier).to_string(),
                    methods.iter().map(|m| (*m).to_string()).collect(),
                )
            })
            .collect();

        Self {
            known,
            generic: GENERIC_OPENERS.iter().map(|s| (*s).to_string()).collect(),
            closers: CLOSERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Adds methods of `qualifier` to the known opener table.
    #[must_use]
    pub fn with_openers<I, S>(mut self, qualifier: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known
            .entry(qualifier.into())
            .or_default()
            .extend(methods.into_iter().map(Into::into));
        self
    }

    /// Replaces the generic fallback fragments.
    #[must_use]
    pub fn with_generic_openers<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.generic = fragments
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Replaces the closer verbs.
    #[must_use]
    pub fn with_closers<I, S>(mut self, closers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.closers = closers
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Classifies a selector call as an opener.
    #[must_use]
    pub fn classify(&self, call: &SelectorCall<'_>) -> Option<OpenerMatch> {
        if call.qualifier_is_ident
            && self
                .known
                .get(call.qualifier)
                .is_some_and(|methods| methods.contains(call.method))
        {
            return Some(OpenerMatch::Known);
        }

        let method = call.method.to_lowercase();
        self.generic
            .iter()
            .any(|fragment| method.contains(fragment.as_str()))
            .then_some(OpenerMatch::Generic)
    }

    /// Whether the call acquires a resource.
    #[must_use]
    pub fn is_opener(&self, call: &SelectorCall<'_>) -> bool {
        self.classify(call).is_some()
    }

    /// Whether the call releases a resource.
    #[must_use]
    pub fn is_closer(&self, call: &SelectorCall<'_>) -> bool {
        self.closers.contains(&call.method.to_lowercase())
    }
}
