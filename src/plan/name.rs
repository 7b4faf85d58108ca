use serde::{Deserialize, Serialize};

/// How a declared field name becomes a column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NameMapping {
    /// `userID` becomes `user_id`.
    #[default]
    SnakeCase,
    Lowercase,
    Verbatim,
}

impl NameMapping {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameMapping::SnakeCase => snake_case(name),
            NameMapping::Lowercase => name.to_lowercase(),
            NameMapping::Verbatim => name.to_string(),
        }
    }
}

/// Converts a camel or pascal case name to snake case. Acronyms are kept
/// together: `HTTPServer` becomes `http_server`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }
        if i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if prev != '_' && boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Key used to match column names against field names; matching is case-insensitive.
pub(crate) fn normalize(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("id"), "id");
        assert_eq!(snake_case("user_id"), "user_id");
        assert_eq!(snake_case("userId"), "user_id");
        assert_eq!(snake_case("UserID"), "user_id");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("address2City"), "address2_city");
        assert_eq!(snake_case("Already_Snake"), "already_snake");
    }

    #[test]
    fn test_mappings() {
        assert_eq!(NameMapping::SnakeCase.apply("createdAt"), "created_at");
        assert_eq!(NameMapping::Lowercase.apply("createdAt"), "createdat");
        assert_eq!(NameMapping::Verbatim.apply("createdAt"), "createdAt");
        assert_eq!(normalize("Created_AT"), "created_at");
    }
}
