#![deny(missing_docs)]

//! # Fragment Merge
//!
//! Two-level merge of resource fragments into a document map. Only the
//! `paths` and `definitions` sections are touched; within them, entries are
//! replaced by name and everything else already present is left alone.

use crate::error::{AppError, AppResult};
use crate::resource::ResourceFragment;
use serde_json::{Map, Value};
use tracing::warn;

/// Top-level key holding path items.
pub const PATHS: &str = "paths";
/// Top-level key holding model definitions.
pub const DEFINITIONS: &str = "definitions";

/// How to react when two producers disagree on the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Keep the later entry silently.
    Overwrite,
    /// Keep the later entry and log a warning.
    #[default]
    Warn,
    /// Fail with [`AppError::DefinitionCollision`].
    Reject,
}

/// Copies `entries` into `target[section]`, creating the section when it is
/// missing or not an object. Incoming entries replace existing ones.
pub fn merge_section(target: &mut Map<String, Value>, section: &str, entries: &Map<String, Value>) {
    let slot = target
        .entry(section.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        warn!(section = %section, "Replacing non-object section before merge");
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(existing) = slot {
        for (name, value) in entries {
            existing.insert(name.clone(), value.clone());
        }
    }
}

/// Merges both sections of `fragment` into `target`.
pub fn merge_fragment(target: &mut Map<String, Value>, fragment: &ResourceFragment) {
    merge_section(target, PATHS, &fragment.paths);
    merge_section(target, DEFINITIONS, &fragment.definitions);
}

/// Accumulates fragments, checking for conflicting entries across them.
#[derive(Debug, Default)]
pub struct FragmentAccumulator {
    policy: CollisionPolicy,
    merged: ResourceFragment,
}

impl FragmentAccumulator {
    /// Creates an empty accumulator.
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            merged: ResourceFragment::default(),
        }
    }

    /// Adds the fragment of the resource named `owner`.
    pub fn push(&mut self, owner: &str, fragment: &ResourceFragment) -> AppResult<()> {
        absorb(self.policy, owner, PATHS, &mut self.merged.paths, &fragment.paths)?;
        absorb(
            self.policy,
            owner,
            DEFINITIONS,
            &mut self.merged.definitions,
            &fragment.definitions,
        )
    }

    /// Returns the accumulated fragment.
    pub fn finish(self) -> ResourceFragment {
        self.merged
    }
}

fn absorb(
    policy: CollisionPolicy,
    owner: &str,
    section: &str,
    into: &mut Map<String, Value>,
    from: &Map<String, Value>,
) -> AppResult<()> {
    for (name, value) in from {
        if into.get(name).is_some_and(|existing| existing != value) {
            report_collision(
                policy,
                name,
                format!(
                    "{}/{} is defined differently by resource '{}'",
                    section, name, owner
                ),
            )?;
        }
        into.insert(name.clone(), value.clone());
    }
    Ok(())
}

/// Applies `policy` to a conflict on `entry`. Returns an error only for
/// [`CollisionPolicy::Reject`]; the caller keeps the later value otherwise.
pub fn report_collision(policy: CollisionPolicy, entry: &str, message: String) -> AppResult<()> {
    match policy {
        CollisionPolicy::Overwrite => Ok(()),
        CollisionPolicy::Warn => {
            warn!(entry = %entry, "{}; keeping the later one", message);
            Ok(())
        }
        CollisionPolicy::Reject => Err(AppError::DefinitionCollision(message)),
    }
}
