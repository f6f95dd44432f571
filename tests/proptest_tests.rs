//! Property-based tests for the formatting helpers.

use danfe::format::{
    format_chave, format_cpf_cnpj, format_currency, format_currency_with, format_data,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn digits(len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0u8..10, len).prop_map(|v| {
        v.into_iter()
            .map(|d| char::from(b'0' + d))
            .collect::<String>()
    })
}

proptest! {
    /// 11 digits always come back in the CPF shape, and masking only
    /// inserts separators — the digits themselves are untouched.
    #[test]
    fn cpf_mask_shape(input in digits(11)) {
        let masked = format_cpf_cnpj(&input);
        prop_assert_eq!(masked.len(), 14);
        prop_assert_eq!(masked.as_bytes()[3], b'.');
        prop_assert_eq!(masked.as_bytes()[7], b'.');
        prop_assert_eq!(masked.as_bytes()[11], b'-');
        let stripped: String = masked.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(stripped, input);
    }

    /// 14 digits always come back in the CNPJ shape.
    #[test]
    fn cnpj_mask_shape(input in digits(14)) {
        let masked = format_cpf_cnpj(&input);
        prop_assert_eq!(masked.len(), 18);
        prop_assert_eq!(masked.as_bytes()[2], b'.');
        prop_assert_eq!(masked.as_bytes()[6], b'.');
        prop_assert_eq!(masked.as_bytes()[10], b'/');
        prop_assert_eq!(masked.as_bytes()[15], b'-');
        let stripped: String = masked.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(stripped, input);
    }

    /// Any other digit count is the identity.
    #[test]
    fn other_lengths_are_identity(len in 0usize..30) {
        prop_assume!(len != 11 && len != 14);
        let input = "7".repeat(len);
        prop_assert_eq!(format_cpf_cnpj(&input), input);
    }

    /// A 44-character key becomes 11 space-prefixed groups of four;
    /// stripping the spaces recovers the input.
    #[test]
    fn chave_grouping(input in digits(44)) {
        let grouped = format_chave(&input);
        prop_assert_eq!(grouped.len(), 55);
        for (i, c) in grouped.chars().enumerate() {
            prop_assert_eq!(c == ' ', i % 5 == 0, "unexpected char at {}", i);
        }
        let stripped: String = grouped.chars().filter(|c| *c != ' ').collect();
        prop_assert_eq!(stripped, input);
    }

    #[test]
    fn chave_other_lengths_are_identity(len in 0usize..60) {
        prop_assume!(len != 44);
        let input = "3".repeat(len);
        prop_assert_eq!(format_chave(&input), input);
    }

    /// Formatting with 2 decimals is reversible: dropping the thousands
    /// separators and swapping the decimal comma recovers the value.
    #[test]
    fn currency_roundtrips(cents in -1_000_000_000i64..1_000_000_000) {
        let valor = Decimal::new(cents, 2);
        let formatted = format_currency_with(valor, 2);
        let plain: String = formatted
            .chars()
            .filter(|c| *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        prop_assert_eq!(plain.parse::<Decimal>().unwrap(), valor);
    }

    /// The sign is a leading '-' exactly for negative values.
    #[test]
    fn currency_sign(cents in -1_000_000i64..1_000_000) {
        let formatted = format_currency_with(Decimal::new(cents, 2), 2);
        prop_assert_eq!(formatted.starts_with('-'), cents < 0);
    }

    /// Default formatting always carries four decimal digits.
    #[test]
    fn currency_default_precision(units in 0i64..1_000_000) {
        let formatted = format_currency(Decimal::from(units));
        let (_, fracao) = formatted.split_once(',').unwrap();
        prop_assert_eq!(fracao.len(), 4);
    }

    /// Integer groups between separators are triples.
    #[test]
    fn currency_groups_are_triples(units in 0i64..10_000_000_000) {
        let formatted = format_currency_with(Decimal::from(units), 0);
        let grupos: Vec<&str> = formatted.split('.').collect();
        prop_assert!(grupos[0].len() <= 3 && !grupos[0].is_empty());
        for grupo in &grupos[1..] {
            prop_assert_eq!(grupo.len(), 3);
        }
    }

    /// Valid ISO dates are reordered day-first, and a time suffix never
    /// changes the result.
    #[test]
    fn date_reorders_components(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
        let date_only = format!("{y:04}-{m:02}-{d:02}");
        let esperado = format!("{d:02}/{m:02}/{y:04}");
        prop_assert_eq!(format_data(&date_only), esperado.clone());

        let with_time = format!("{date_only}T10:20:30-03:00");
        prop_assert_eq!(format_data(&with_time), esperado);
    }
}
