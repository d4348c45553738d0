use regex::Regex;
use std::sync::OnceLock;

/// A token is either a maximal run of non-separator characters or a single
/// separator (space, comma, hyphen). Matching both alternatives keeps the
/// separators, so concatenating the tokens reproduces the input exactly.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^ ,\-]+|[ ,\-]").expect("token pattern is valid"))
}

/// Split an address into the units a person would type one keystroke batch
/// at a time. No normalization; the address is never parsed semantically.
pub fn tokenize(address: &str) -> Vec<String> {
    token_pattern()
        .find_iter(address)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_keeps_separators() {
        let tokens = tokenize("148-154 Jonson Street");
        assert_eq!(tokens, vec!["148", "-", "154", " ", "Jonson", " ", "Street"]);
    }

    #[test]
    fn reconstruction_is_exact() {
        for address in [
            "148-154 Jonson Street, Byron Bay NSW 2481",
            "1 Main Street",
            "  double  spaces ",
            "commas,,everywhere",
            "--",
            "",
        ] {
            assert_eq!(tokenize(address).concat(), address);
        }
    }

    #[test]
    fn separator_only_input_is_one_token() {
        assert_eq!(tokenize(" "), vec![" "]);
        assert_eq!(tokenize(","), vec![","]);
        assert_eq!(tokenize("-"), vec!["-"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
