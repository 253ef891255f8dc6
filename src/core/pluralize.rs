//! Pluralization for collection route paths

/// Utility for deriving the plural collection name of a resource
pub struct Pluralizer;

impl Pluralizer {
    /// Convert a singular resource name to its plural form
    ///
    /// # Examples
    ///
    /// ```
    /// use crudgen::core::pluralize::Pluralizer;
    ///
    /// assert_eq!(Pluralizer::pluralize("event"), "events");
    /// assert_eq!(Pluralizer::pluralize("company"), "companies");
    /// assert_eq!(Pluralizer::pluralize("address"), "addresses");
    /// ```
    pub fn pluralize(singular: &str) -> String {
        if singular.is_empty() {
            return singular.to_string();
        }

        match singular {
            // Consonant + y -> ies
            s if s.ends_with('y')
                && s.len() > 1
                && !matches!(
                    s.as_bytes()[s.len() - 2],
                    b'a' | b'e' | b'i' | b'o' | b'u'
                ) =>
            {
                format!("{}ies", &s[..s.len() - 1])
            }

            // Sibilant endings -> es
            s if s.ends_with('s')
                || s.ends_with("sh")
                || s.ends_with("ch")
                || s.ends_with('x')
                || s.ends_with('z') =>
            {
                format!("{}es", s)
            }

            // fe -> ves, f -> ves
            s if s.ends_with("fe") && s.len() > 2 => format!("{}ves", &s[..s.len() - 2]),
            s if s.ends_with('f') && s.len() > 1 => format!("{}ves", &s[..s.len() - 1]),

            // Consonant + o -> es, with common exceptions
            s if s.ends_with('o') && s.len() > 1 => {
                let before_o = s.as_bytes()[s.len() - 2];
                if matches!(before_o, b'a' | b'e' | b'i' | b'o' | b'u')
                    || matches!(s, "photo" | "piano" | "halo")
                {
                    format!("{}s", s)
                } else {
                    format!("{}es", s)
                }
            }

            s => format!("{}s", s),
        }
    }
}
