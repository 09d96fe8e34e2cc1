use proptest::prelude::*;
use utilize_config::{TRUTHY_TOKENS, coerce_boolean};

fn recase(token: &str, mask: &[bool]) -> String {
    token
        .chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    #[test]
    fn test_truthy_tokens_ignore_letter_case(
        index in 0..TRUTHY_TOKENS.len(),
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let token = recase(TRUTHY_TOKENS[index], &mask);
        prop_assert!(coerce_boolean(&token));
    }

    #[test]
    fn test_unrecognized_values_are_false(value in "[a-z0-9 ]{0,12}") {
        let expected = TRUTHY_TOKENS.contains(&value.as_str());
        prop_assert_eq!(coerce_boolean(&value), expected);
    }
}
