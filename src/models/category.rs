use crate::error::ValidationError;

/// A normalized category label.
///
/// Normalization trims, collapses whitespace runs and title-cases each word,
/// so `"  eating   OUT "` and `"Eating Out"` are the same key. Both the
/// recording path and budget lookups go through this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct CategoryName(String);

impl CategoryName {
    pub(crate) fn parse(raw: &str) -> Result<Self, ValidationError> {
        let words: Vec<String> = raw.split_whitespace().map(title_case).collect();
        if words.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(Self(words.join(" ")))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
