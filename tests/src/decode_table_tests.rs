//! Decode table verification against the canonical international table

/// Every assignment the decoder must reproduce, as (morse, character)
pub const CANONICAL_TABLE: &[(&str, char)] = &[
    // Letters
    (".-", 'A'),
    ("-...", 'B'),
    ("-.-.", 'C'),
    ("-..", 'D'),
    (".", 'E'),
    ("..-.", 'F'),
    ("--.", 'G'),
    ("....", 'H'),
    ("..", 'I'),
    (".---", 'J'),
    ("-.-", 'K'),
    (".-..", 'L'),
    ("--", 'M'),
    ("-.", 'N'),
    ("---", 'O'),
    (".--.", 'P'),
    ("--.-", 'Q'),
    (".-.", 'R'),
    ("...", 'S'),
    ("-", 'T'),
    ("..-", 'U'),
    ("...-", 'V'),
    (".--", 'W'),
    ("-..-", 'X'),
    ("-.--", 'Y'),
    ("--..", 'Z'),
    // Digits
    ("-----", '0'),
    (".----", '1'),
    ("..---", '2'),
    ("...--", '3'),
    ("....-", '4'),
    (".....", '5'),
    ("-....", '6'),
    ("--...", '7'),
    ("---..", '8'),
    ("----.", '9'),
    // Punctuation
    (".-.-.-", '.'),
    ("--..--", ','),
    ("..--..", '?'),
    (".----.", '\''),
    ("-.-.--", '!'),
    ("-..-.", '/'),
    ("-.--.", '('),
    ("-.--.-", ')'),
    (".-...", '&'),
    ("---...", ':'),
    ("-.-.-.", ';'),
    ("-...-", '='),
    (".-.-.", '+'),
    ("-....-", '-'),
    ("..--.-", '_'),
    (".-..-.", '"'),
    (".--.-.", '@'),
];

#[cfg(test)]
mod tests {
    use super::CANONICAL_TABLE;
    use decoder_core::morse::lookup;
    use decoder_core::test_utils::key_script::symbols;
    use decoder_core::types::Symbol;
    use rstest::rstest;

    #[test]
    fn full_table_round_trip() {
        for (code, expected) in CANONICAL_TABLE {
            let sequence = symbols(code);
            assert_eq!(
                lookup(&sequence),
                Some(*expected),
                "sequence {:?} should decode to {:?}",
                code,
                expected
            );
        }
    }

    #[test]
    fn table_is_uppercase_only() {
        for (_, ch) in CANONICAL_TABLE {
            assert!(!ch.is_lowercase(), "{:?} must be emitted uppercase", ch);
        }
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        for (i, (code_a, _)) in CANONICAL_TABLE.iter().enumerate() {
            for (code_b, _) in &CANONICAL_TABLE[i + 1..] {
                assert_ne!(code_a, code_b);
            }
        }
    }

    #[rstest]
    #[case(".", 'E')]
    #[case("-", 'T')]
    #[case("-.-.", 'C')]
    #[case("-----", '0')]
    #[case("..--..", '?')]
    #[case("-..-.", '/')]
    fn spot_checks(#[case] code: &str, #[case] expected: char) {
        assert_eq!(lookup(&symbols(code)), Some(expected));
    }

    #[test]
    fn unmapped_sequences_return_none() {
        // Seven dots exceeds every real code length
        assert_eq!(lookup(&[Symbol::Dot; 7]), None);
        // The international "error" prosign (eight dots) is deliberately unmapped
        assert_eq!(lookup(&[Symbol::Dot; 8]), None);
        // Six dashes has no assignment
        assert_eq!(lookup(&[Symbol::Dash; 6]), None);
        assert_eq!(lookup(&[]), None);
    }
}
