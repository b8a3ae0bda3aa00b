// * Request flag classification
// * One place decides what a raw `clean` / `tidy_amazon` value means, so every
// * operation reads flags the same way.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    // * Parameter not supplied
    Unset,
    // * Starts with `t` or `1`
    Truthy,
    // * Starts with `f` or `0`
    Falsy,
    // * Supplied but neither of the above (including empty)
    Unrecognized,
}

impl Flag {
    // * Leading-character classification, case-sensitive.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            None => Flag::Unset,
            Some(value) => match value.chars().next() {
                Some('t') | Some('1') => Flag::Truthy,
                Some('f') | Some('0') => Flag::Falsy,
                _ => Flag::Unrecognized,
            },
        }
    }

    pub fn is_truthy(self) -> bool {
        self == Flag::Truthy
    }

    pub fn is_falsy(self) -> bool {
        self == Flag::Falsy
    }
}

// * `tidy_amazon` only switches on for the exact strings `true` and `1`.
pub fn is_strictly_enabled(raw: Option<&str>) -> bool {
    matches!(raw, Some("true") | Some("1"))
}

// * Whether Amazon canonicalization keeps the original query string.
// * The query is kept only when `clean` was explicitly switched off; any other
// * `clean` value (missing, truthy, unrecognized) drops it.
pub fn keep_amazon_query(clean: Flag) -> bool {
    clean.is_falsy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Flag::classify(None), Flag::Unset);
        assert_eq!(Flag::classify(Some("true")), Flag::Truthy);
        assert_eq!(Flag::classify(Some("t")), Flag::Truthy);
        assert_eq!(Flag::classify(Some("1")), Flag::Truthy);
        assert_eq!(Flag::classify(Some("10")), Flag::Truthy);
        assert_eq!(Flag::classify(Some("false")), Flag::Falsy);
        assert_eq!(Flag::classify(Some("0")), Flag::Falsy);
        assert_eq!(Flag::classify(Some("")), Flag::Unrecognized);
        assert_eq!(Flag::classify(Some("yes")), Flag::Unrecognized);
        assert_eq!(Flag::classify(Some("TRUE")), Flag::Unrecognized);
        assert_eq!(Flag::classify(Some(" true")), Flag::Unrecognized);
    }

    #[test]
    fn test_strict_enable() {
        assert!(is_strictly_enabled(Some("true")));
        assert!(is_strictly_enabled(Some("1")));
        assert!(!is_strictly_enabled(Some("t")));
        assert!(!is_strictly_enabled(Some("True")));
        assert!(!is_strictly_enabled(Some("yes")));
        assert!(!is_strictly_enabled(None));
    }

    #[test]
    fn test_keep_query_table() {
        assert!(!keep_amazon_query(Flag::classify(None)));
        assert!(!keep_amazon_query(Flag::classify(Some("1"))));
        assert!(!keep_amazon_query(Flag::classify(Some("true"))));
        assert!(keep_amazon_query(Flag::classify(Some("0"))));
        assert!(keep_amazon_query(Flag::classify(Some("false"))));
        assert!(!keep_amazon_query(Flag::classify(Some("maybe"))));
    }
}
