// src/env.rs

//! Environment composition for spawned commands.
//!
//! A command's process environment is the ambient environment followed by
//! each configured map in order (`[env]`, then `[commands.<name>.env]`),
//! with `${VAR}` / `$VAR` references expanded.
//!
//! Lookup order for a reference made from map *i*:
//! 1. another key of map *i* (itself expanded by these rules),
//! 2. the value composed so far from maps `0..i`,
//! 3. the base (ambient) environment,
//! 4. the empty string.
//!
//! Expansion within a map does not depend on key order. A key that refers
//! to itself (`PATH = "${PATH}:/opt/bin"`), or any key on a reference cycle,
//! skips step 1 for the keys already being expanded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z0-9_]+))").expect("valid variable reference regex")
});

/// Flat process environment, in application order.
///
/// Later entries win when the same key appears more than once, which is
/// also what happens when the list is applied to a `Command` via `envs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedEnv {
    vars: Vec<(String, String)>,
}

impl ComposedEnv {
    /// Effective value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `KEY=VALUE` strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.vars.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

/// Compose on top of the current process environment.
///
/// Ambient variables that are not valid UTF-8 are left out.
pub fn compose_env(maps: &[&BTreeMap<String, String>]) -> ComposedEnv {
    let ambient = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    compose_env_with_base(ambient, maps)
}

/// Compose on top of an explicit base environment.
pub fn compose_env_with_base(
    base: impl IntoIterator<Item = (String, String)>,
    maps: &[&BTreeMap<String, String>],
) -> ComposedEnv {
    let mut vars: Vec<(String, String)> = base.into_iter().collect();
    let ambient: HashMap<String, String> = vars.iter().cloned().collect();
    let mut composed: HashMap<String, String> = HashMap::new();

    for &map in maps {
        let expanded: Vec<(String, String)> = {
            let mut resolver = MapResolver {
                map,
                outer: &composed,
                ambient: &ambient,
                visiting: HashSet::new(),
            };
            map.keys()
                .map(|key| (key.clone(), resolver.resolve_key(key)))
                .collect()
        };

        for (key, value) in expanded {
            composed.insert(key.clone(), value.clone());
            vars.push((key, value));
        }
    }

    ComposedEnv { vars }
}

/// Expand `${VAR}` / `$VAR` in `raw` using `lookup`.
pub fn expand_with(raw: &str, mut lookup: impl FnMut(&str) -> String) -> String {
    VAR_REF
        .replace_all(raw, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name)
        })
        .into_owned()
}

struct MapResolver<'a> {
    map: &'a BTreeMap<String, String>,
    outer: &'a HashMap<String, String>,
    ambient: &'a HashMap<String, String>,
    visiting: HashSet<String>,
}

impl MapResolver<'_> {
    fn resolve_key(&mut self, key: &str) -> String {
        let map = self.map;
        let Some(raw) = map.get(key) else {
            return self.lookup_outside(key);
        };

        self.visiting.insert(key.to_string());
        let value = expand_with(raw, |name| self.lookup(name));
        self.visiting.remove(key);
        value
    }

    fn lookup(&mut self, name: &str) -> String {
        if self.map.contains_key(name) && !self.visiting.contains(name) {
            return self.resolve_key(name);
        }
        self.lookup_outside(name)
    }

    fn lookup_outside(&self, name: &str) -> String {
        self.outer
            .get(name)
            .or_else(|| self.ambient.get(name))
            .cloned()
            .unwrap_or_default()
    }
}
