//! Singular forms of entity names.
//!
//! Entity names come from table names and are usually plural
//! (`license_owners`), while foreign-key columns use the singular
//! (`license_owner_id`). Name matching tries both.

use inflector::Inflector;

/// Irregular plurals common in warehouse table names.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("staff", "staff"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("address", "addresses"),
    ("status", "statuses"),
];

/// Singularize one word, irregulars first, then inflector.
///
/// # Examples
/// ```ignore
/// assert_eq!(singularize("owners"), "owner");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("people"), "person");
/// ```
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural || lower == *singular {
            return singular.to_string();
        }
    }

    lower.to_singular()
}

/// Singular form of a snake_case entity name: only the last segment is
/// inflected (`license_owners` -> `license_owner`).
pub fn singular_name(name: &str) -> String {
    match name.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, singularize(last)),
        None => singularize(name),
    }
}
