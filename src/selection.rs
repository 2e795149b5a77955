//! Selection of the objects to document.
//!
//! At most one retention strategy applies: a whitelist, a blacklist, or a set
//! of output groups (each group naming the objects documented together on one
//! page). Names starting with an underscore are protected and never selected.

use crate::error::{DocError, Result};
use crate::inventory::DocObject;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// A named set of objects documented together in one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    pub name: String,
    pub members: Vec<String>,
}

impl std::str::FromStr for OutputGroup {
    type Err = DocError;

    /// Parse a `group=name1,name2` specification.
    fn from_str(spec: &str) -> Result<Self> {
        let (name, members) = match spec.split_once('=') {
            Some((name, members)) if !name.is_empty() && !members.contains('=') => {
                (name, members)
            }
            _ => return Err(DocError::InvalidGroupSpec(spec.to_string())),
        };
        Ok(OutputGroup {
            name: name.to_string(),
            members: members
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

/// Parse group specifications, rejecting duplicated group names.
pub fn parse_groups(specs: &[String]) -> Result<Vec<OutputGroup>> {
    let mut seen = HashSet::new();
    let mut groups = Vec::with_capacity(specs.len());
    for spec in specs {
        let group: OutputGroup = spec.parse()?;
        if !seen.insert(group.name.clone()) {
            return Err(DocError::DuplicateGroup(group.name));
        }
        groups.push(group);
    }
    Ok(groups)
}

/// How documentation targets are retained, by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Retention {
    #[default]
    All,
    Whitelist(HashSet<String>),
    Blacklist(HashSet<String>),
    Groups(Vec<OutputGroup>),
}

impl Retention {
    /// Validate and determine the retention strategy from its three sources.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::ConflictingSelection`] if more than one source is
    /// non-empty.
    pub fn from_options(
        whitelist: &[String],
        blacklist: &[String],
        groups: Vec<OutputGroup>,
    ) -> Result<Self> {
        let given = [!whitelist.is_empty(), !blacklist.is_empty(), !groups.is_empty()];
        match given {
            [false, false, false] => Ok(Retention::All),
            [true, false, false] => Ok(Retention::Whitelist(whitelist.iter().cloned().collect())),
            [false, true, false] => Ok(Retention::Blacklist(blacklist.iter().cloned().collect())),
            [false, false, true] => Ok(Retention::Groups(groups)),
            _ => Err(DocError::ConflictingSelection),
        }
    }

    pub fn retains(&self, name: &str) -> bool {
        match self {
            Retention::All => true,
            Retention::Whitelist(names) => names.contains(name),
            Retention::Blacklist(names) => !names.contains(name),
            Retention::Groups(groups) => groups.iter().any(|g| g.members.iter().any(|m| m == name)),
        }
    }

    pub fn groups(&self) -> Option<&[OutputGroup]> {
        match self {
            Retention::Groups(groups) => Some(groups),
            _ => None,
        }
    }
}

/// Determine whether an object name suggests it's protected.
pub fn is_protected(name: &str) -> bool {
    name.starts_with('_')
}

/// Select the documentation targets kept by `retention`.
///
/// Declared group members absent from `targets` are reported as warnings.
/// Protected names are dropped last, so they still count toward name clashes.
///
/// # Errors
///
/// Returns [`DocError::RepeatedTargets`] if several retained targets share a
/// name.
pub fn select_targets<'a>(
    targets: Vec<&'a DocObject>,
    retention: &Retention,
) -> Result<Vec<&'a DocObject>> {
    let retained: Vec<&DocObject> = targets
        .into_iter()
        .filter(|t| retention.retains(&t.name))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in &retained {
        *counts.entry(t.name.as_str()).or_default() += 1;
    }
    let mut repeated: Vec<String> = counts
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    if !repeated.is_empty() {
        repeated.sort();
        return Err(DocError::RepeatedTargets(repeated));
    }

    if let Some(groups) = retention.groups() {
        let mut missing: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.members.iter())
            .map(String::as_str)
            .filter(|m| !counts.contains_key(m))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        if !missing.is_empty() {
            warn!("{} target(s) missing: {}", missing.len(), missing.join(", "));
        }
    }

    let selected: Vec<&DocObject> = retained
        .into_iter()
        .filter(|t| !is_protected(&t.name))
        .collect();
    debug!("Selected {} documentation target(s)", selected.len());
    Ok(selected)
}
