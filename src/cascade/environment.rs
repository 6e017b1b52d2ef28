//! Owned variable store that the cascade is applied to.

use std::collections::BTreeMap;

/// Read access to resolved variables.
pub trait EnvLookup {
    /// Final value of `name`, if defined.
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// Environment seen by the service once the cascade has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveEnvironment {
    vars: BTreeMap<String, String>,
}

impl EffectiveEnvironment {
    /// Empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the inherited process environment.
    ///
    /// Entries whose name or value is not valid UTF-8 are left out.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Set `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Value of `name`, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable is defined.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvLookup for EffectiveEnvironment {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EffectiveEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
