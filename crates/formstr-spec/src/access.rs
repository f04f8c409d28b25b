use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tag::{Tag, kind};

/// Set of public-key identifiers. Every operation returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AccessList(BTreeSet<String>);

impl AccessList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(&self, key: impl Into<String>) -> Self {
        let mut keys = self.0.clone();
        keys.insert(key.into());
        Self(keys)
    }

    pub fn without(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.remove(key);
        Self(keys)
    }

    pub fn union(&self, other: &AccessList) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &AccessList) -> Self {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn intersection(&self, other: &AccessList) -> Self {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AccessList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for AccessList {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Splits the keys of a spec into `(edit, view)`.
///
/// `view` comes from `allowed` tags; `edit` is every `p` key not in `view`.
pub fn partition_access(spec: &[Tag]) -> (AccessList, AccessList) {
    let view: AccessList = payloads(spec, kind::ALLOWED).collect();
    let all: AccessList = payloads(spec, kind::PUBKEY).collect();
    (all.difference(&view), view)
}

fn payloads<'a>(spec: &'a [Tag], wanted: &'a str) -> impl Iterator<Item = &'a str> {
    spec.iter()
        .filter(move |tag| tag.is(wanted))
        .filter_map(|tag| tag.get_str(1))
}
