//! Type name normalization

/// Canonical short form of a type name, used as the resource file stem.
///
/// Keeps alphanumeric characters, lowercased; everything else is dropped.
///
/// ```ignore
/// assert_eq!(shortform("Person-Node"), "personnode");
/// ```
pub fn shortform(type_name: &str) -> String {
    type_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortform() {
        assert_eq!(shortform("Person-Node"), "personnode");
        assert_eq!(shortform("ORG_unit 2"), "orgunit2");
        assert_eq!(shortform("already"), "already");
    }

    #[test]
    fn test_shortform_strips_path_characters() {
        assert_eq!(shortform("../../etc/passwd"), "etcpasswd");
        assert_eq!(shortform("--"), "");
    }
}
