//! TRAPI name conversion
//!
//! Biolink YAML uses English names ("named thing", "treated by"); TRAPI
//! uses `NamedThing` for categories and `treated_by` for predicates.

/// "named thing" → "NamedThing"
///
/// Each space-separated word gets its first character upper-cased; the rest
/// of the word is left untouched. Already converted names pass through.
pub fn to_category_name(english: &str) -> String {
    english
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// "treated by" → "treated_by"
pub fn to_predicate_name(english: &str) -> String {
    english.replace(' ', "_")
}
