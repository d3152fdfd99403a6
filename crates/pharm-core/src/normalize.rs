//! Matching key for free-text drug names.

use std::fmt;

/// Remove every whitespace character and lowercase the rest.
///
/// Accepts anything displayable, so numeric cells normalize through their
/// string form.
///
/// # Examples
///
/// ```
/// use pharm_core::normalize;
///
/// assert_eq!(normalize("A B  c"), "abc");
/// assert_eq!(normalize(" 타이레놀 500 mg "), "타이레놀500mg");
/// assert_eq!(normalize(&42), "42");
/// ```
pub fn normalize<T: fmt::Display + ?Sized>(value: &T) -> String {
    let text = value.to_string();
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    compact.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn whitespace_and_case_insensitive() {
        assert_eq!(normalize("A B  c"), normalize("abc"));
        assert_eq!(normalize("abc"), normalize(" A   B C "));
    }

    #[test]
    fn tabs_newlines_and_unicode_spaces_are_removed() {
        assert_eq!(normalize("Drug\tX\n"), "drugx");
        assert_eq!(normalize("Drug\u{3000}X"), "drugx");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    proptest! {
        #[test]
        fn output_has_no_whitespace(input in "\\PC*") {
            let normalized = normalize(input.as_str());
            prop_assert!(!normalized.chars().any(char::is_whitespace));
        }

        #[test]
        fn idempotent(input in "[a-zA-Z0-9가-힣 \t]*") {
            let once = normalize(input.as_str());
            prop_assert_eq!(normalize(once.as_str()), once.clone());
        }

        #[test]
        fn inserted_spaces_do_not_matter(word in "[a-zA-Z가-힣]{1,12}", at in 0usize..12) {
            let chars: Vec<char> = word.chars().collect();
            let split = at.min(chars.len());
            let spaced: String = chars[..split]
                .iter()
                .chain(std::iter::once(&' '))
                .chain(chars[split..].iter())
                .collect();
            prop_assert_eq!(normalize(spaced.as_str()), normalize(word.as_str()));
        }
    }
}
