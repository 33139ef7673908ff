#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for deriving definition names and `$ref` pointers from resource
//! and field names.

/// Upper-cases the first character of `s`, leaving the rest untouched.
///
/// `"vegetable"` -> `"Vegetable"`, `"hyphen-name"` -> `"Hyphen-name"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name under which the model of a resource is published in `definitions`.
pub fn definition_name(singular: &str) -> String {
    capitalize(singular)
}

/// Synthetic definition name for an embedded schema reached through `field`
/// from the definition named `parent`.
///
/// Deterministic: the same field path always yields the same name.
pub fn synthetic_name(parent: &str, field: &str) -> String {
    format!("{}{}", parent, capitalize(field))
}

/// `#/definitions/<name>` pointer.
pub fn definition_ref(name: &str) -> String {
    format!("#/definitions/{}", name)
}

/// `#/parameters/<name>` pointer.
pub fn parameter_ref(name: &str) -> String {
    format!("#/parameters/{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("vegetable"), "Vegetable");
        assert_eq!(capitalize("v"), "V");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("Goose"), "Goose");
        assert_eq!(capitalize("éclair"), "Éclair");
    }

    #[test]
    fn test_synthetic_name() {
        assert_eq!(synthetic_name("Goose", "stuffed"), "GooseStuffed");
        assert_eq!(
            synthetic_name("GooseStuffed", "crumbs"),
            "GooseStuffedCrumbs"
        );
    }

    #[test]
    fn test_refs() {
        assert_eq!(definition_ref("Vegetable"), "#/definitions/Vegetable");
        assert_eq!(parameter_ref("skip"), "#/parameters/skip");
    }
}
