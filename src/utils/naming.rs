//! Name conversions between route segments and controller/action names.

/// Convert `PascalCase` to `kebab-case` (`SuccessPage` -> `success-page`).
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if c == '_' {
            result.push('-');
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert `kebab-case` or `snake_case` to `PascalCase`.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether `s` can name a controller or action: non-empty ASCII letters,
/// digits, `-` and `_`, starting with a letter.
pub fn is_route_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("SuccessPage"), "success-page");
        assert_eq!(to_kebab_case("Home"), "home");
        assert_eq!(to_kebab_case("access_denied"), "access-denied");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("success-page"), "SuccessPage");
        assert_eq!(to_pascal_case("notes"), "Notes");
        assert_eq!(to_pascal_case("change_template"), "ChangeTemplate");
    }

    #[test]
    fn test_round_trip_of_route_names() {
        for name in ["Index", "SuccessPage", "AccessDenied", "ChangeTemplate"] {
            assert_eq!(to_pascal_case(&to_kebab_case(name)), name);
        }
    }

    #[test]
    fn test_is_route_name() {
        assert!(is_route_name("Notes"));
        assert!(is_route_name("success-page"));
        assert!(is_route_name("change_template"));
        assert!(!is_route_name(""));
        assert!(!is_route_name("/evil.example"));
        assert!(!is_route_name("evil.example"));
        assert!(!is_route_name("a\\b"));
        assert!(!is_route_name("javascript:alert(1)"));
        assert!(!is_route_name("9lives"));
    }
}
