#![deny(missing_docs)]

//! # Field Selection
//!
//! Parses the visibility directive of a resource (`"-password -secret"` or
//! `"name color"`) once, then answers per-field visibility questions with set
//! lookups. Mirrors the projection syntax of the query layer so documented
//! fields match what queries return.

use crate::descriptor::{FieldDescriptor, Selected, PRIMARY_KEY};
use std::collections::HashSet;

/// How the directive selects fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Deny-list: `-name` tokens hide fields.
    Exclusive,
    /// Allow-list: only named fields (and the primary key) are shown.
    Inclusive,
}

/// A parsed visibility directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    tokens: HashSet<String>,
}

impl Selection {
    /// Parses a directive. Returns `None` for a blank directive.
    pub fn parse(directive: &str) -> Option<Self> {
        let tokens: HashSet<String> = directive.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return None;
        }
        let mode = if tokens.iter().any(|t| t.starts_with('-')) {
            SelectionMode::Exclusive
        } else {
            SelectionMode::Inclusive
        };
        Some(Self { mode, tokens })
    }

    /// The detected mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Whether `name` survives the directive, ignoring schema declarations.
    pub fn admits(&self, name: &str) -> bool {
        match self.mode {
            SelectionMode::Exclusive => !self.tokens.contains(&format!("-{}", name)),
            SelectionMode::Inclusive => {
                name == PRIMARY_KEY
                    || self.tokens.contains(name)
                    || self.tokens.contains(&format!("+{}", name))
            }
        }
    }
}

/// Decides whether a field appears in the generated definition.
///
/// Fields the schema deselects stay private regardless of the directive.
pub fn is_visible(field: &FieldDescriptor, selection: Option<&Selection>) -> bool {
    if field.selected == Selected::Excluded {
        return false;
    }
    selection.map_or(true, |s| s.admits(&field.name))
}
