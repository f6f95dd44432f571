//! Pure formatting helpers used when building DANFE template data.
//!
//! Every function accepts absent/empty input and answers with an empty
//! string (or the input unchanged, for the fixed-length masks) — rendering
//! must never fail because a field is missing from the document.

use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used when a call site does not specify a count.
pub const CASAS_PADRAO: u32 = 4;

/// Apply the CPF display mask: `XXX.XXX.XXX-XX`.
///
/// Separators are emitted only before non-empty groups, so a partial digit
/// string never ends with a dangling separator.
pub fn mask_cpf(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = take(&chars, 0, 3);
    for (inicio, fim, sep) in [(3, 6, '.'), (6, 9, '.'), (9, usize::MAX, '-')] {
        let grupo = take(&chars, inicio, fim);
        if !grupo.is_empty() {
            out.push(sep);
            out.push_str(&grupo);
        }
    }
    out
}

/// Apply the CNPJ display mask: `XX.XXX.XXX/XXXX-XX`.
pub fn mask_cnpj(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = take(&chars, 0, 2);
    for (inicio, fim, sep) in [(2, 5, '.'), (5, 8, '.'), (8, 12, '/'), (12, usize::MAX, '-')] {
        let grupo = take(&chars, inicio, fim);
        if !grupo.is_empty() {
            out.push(sep);
            out.push_str(&grupo);
        }
    }
    out
}

/// Mask a national identifier by its digit count: 11 digits are a CPF,
/// 14 a CNPJ. Any other length is returned unchanged.
pub fn format_cpf_cnpj(valor: &str) -> String {
    match valor.chars().count() {
        11 => mask_cpf(valor),
        14 => mask_cnpj(valor),
        _ => valor.to_string(),
    }
}

/// Format an NFe timestamp (`YYYY-MM-DDThh:mm:ss±hh:mm`, or date-only
/// `YYYY-MM-DD`) as `DD/MM/YYYY`.
///
/// The time-of-day and UTC offset are discarded — the DANFE date boxes are
/// date-only. Empty or unparseable input yields an empty string.
pub fn format_data(dt: &str) -> String {
    if dt.is_empty() {
        return String::new();
    }
    let data = dt.split('T').next().unwrap_or_default();
    match NaiveDate::parse_from_str(data, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => String::new(),
    }
}

/// Format an NFe timestamp as a local wall-clock `hh:mm:ss`.
///
/// Unlike [`format_data`] this interprets the offset: the instant is
/// converted to the system timezone before decomposition. Date-only input
/// is completed to midnight UTC first. Empty or unparseable input yields
/// an empty string.
pub fn format_hora(dt: &str) -> String {
    if dt.is_empty() {
        return String::new();
    }
    let completo = if dt.len() == 10 {
        format!("{dt}T00:00:00+00:00")
    } else {
        dt.to_string()
    };
    match DateTime::parse_from_rfc3339(&completo) {
        Ok(t) => t.with_timezone(&Local).format("%H:%M:%S").to_string(),
        Err(_) => String::new(),
    }
}

/// Format a value with the default four decimal places — quantities, unit
/// values and weights on the DANFE keep the full NFe precision.
pub fn format_currency(valor: Decimal) -> String {
    format_currency_with(valor, CASAS_PADRAO)
}

/// Format a value in the Brazilian convention: `.` grouping thousands,
/// `,` before a fixed count of decimal digits, leading `-` preserved for
/// negative input, no currency symbol. `casas == 0` emits no decimal
/// separator. Midpoints round away from zero.
pub fn format_currency_with(valor: Decimal, casas: u32) -> String {
    let negativo = valor.is_sign_negative() && !valor.is_zero();
    let abs = valor
        .abs()
        .round_dp_with_strategy(casas, RoundingStrategy::MidpointAwayFromZero);
    let fixo = format!("{abs:.casas$}", casas = casas as usize);
    let (inteiro, fracao) = match fixo.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixo.as_str(), None),
    };

    let mut out = String::with_capacity(fixo.len() + inteiro.len() / 3 + 1);
    if negativo {
        out.push('-');
    }
    let len = inteiro.len();
    for (i, c) in inteiro.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if let Some(f) = fracao {
        out.push(',');
        out.push_str(f);
    }
    out
}

/// Format the 44-character access key as space-separated groups of four.
///
/// A space is inserted before every 4th character starting at position 0,
/// so the result carries a leading space. Any other length is returned
/// unchanged.
pub fn format_chave(chave: &str) -> String {
    if chave.chars().count() != 44 {
        return chave.to_string();
    }
    let mut out = String::with_capacity(55);
    for (i, c) in chave.chars().enumerate() {
        if i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn take(chars: &[char], inicio: usize, fim: usize) -> String {
    let inicio = inicio.min(chars.len());
    let fim = fim.min(chars.len()).max(inicio);
    chars[inicio..fim].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    // --- CPF/CNPJ masks ---

    #[test]
    fn cpf_mask() {
        assert_eq!(format_cpf_cnpj("12345678901"), "123.456.789-01");
    }

    #[test]
    fn cnpj_mask() {
        assert_eq!(format_cpf_cnpj("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn other_lengths_pass_through() {
        assert_eq!(format_cpf_cnpj(""), "");
        assert_eq!(format_cpf_cnpj("123"), "123");
        assert_eq!(format_cpf_cnpj("123456789012"), "123456789012");
    }

    #[test]
    fn partial_groups_have_no_trailing_separator() {
        assert_eq!(mask_cpf("123"), "123");
        assert_eq!(mask_cpf("12345"), "123.45");
        assert_eq!(mask_cpf("123456789"), "123.456.789");
        assert_eq!(mask_cnpj("12"), "12");
        assert_eq!(mask_cnpj("12345678"), "12.345.678");
    }

    // --- Dates and times ---

    #[test]
    fn date_only_input() {
        assert_eq!(format_data("2023-05-04"), "04/05/2023");
    }

    #[test]
    fn time_component_is_discarded() {
        assert_eq!(format_data("2023-05-04T10:20:30+00:00"), "04/05/2023");
        assert_eq!(format_data("2023-05-04T23:59:59-03:00"), "04/05/2023");
    }

    #[test]
    fn empty_or_garbage_date_yields_empty() {
        assert_eq!(format_data(""), "");
        assert_eq!(format_data("not a date"), "");
    }

    #[test]
    fn unpadded_date_components_are_padded() {
        assert_eq!(format_data("2023-5-4"), "04/05/2023");
    }

    #[test]
    fn hora_roundtrips_through_local_time() {
        // Built from a local time so the expectation holds in any timezone.
        let local = Local.with_ymd_and_hms(2023, 5, 4, 12, 7, 9).unwrap();
        assert_eq!(format_hora(&local.to_rfc3339()), "12:07:09");
    }

    #[test]
    fn hora_empty_and_garbage() {
        assert_eq!(format_hora(""), "");
        assert_eq!(format_hora("not a timestamp"), "");
    }

    #[test]
    fn hora_is_zero_padded() {
        let local = Local.with_ymd_and_hms(2023, 5, 4, 1, 2, 3).unwrap();
        assert_eq!(format_hora(&local.to_rfc3339()), "01:02:03");
    }

    // --- Currency ---

    #[test]
    fn currency_two_decimals() {
        assert_eq!(format_currency_with(dec!(1234.5), 2), "1.234,50");
    }

    #[test]
    fn currency_negative() {
        assert_eq!(format_currency_with(dec!(-10), 2), "-10,00");
    }

    #[test]
    fn currency_default_four_decimals() {
        assert_eq!(format_currency(dec!(0)), "0,0000");
        assert_eq!(format_currency(dec!(2)), "2,0000");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency_with(dec!(1234567.891), 2), "1.234.567,89");
        assert_eq!(format_currency_with(dec!(1000000), 2), "1.000.000,00");
    }

    #[test]
    fn currency_zero_decimal_places() {
        assert_eq!(format_currency_with(dec!(1234.56), 0), "1.235");
        assert_eq!(format_currency_with(dec!(999), 0), "999");
    }

    #[test]
    fn currency_rounds_midpoint_away_from_zero() {
        assert_eq!(format_currency_with(dec!(0.005), 2), "0,01");
        assert_eq!(format_currency_with(dec!(-0.005), 2), "-0,01");
    }

    // --- Access key ---

    #[test]
    fn chave_grouped_in_fours_with_leading_space() {
        let chave = "1".repeat(44);
        assert_eq!(
            format_chave(&chave),
            " 1111 1111 1111 1111 1111 1111 1111 1111 1111 1111 1111"
        );
    }

    #[test]
    fn chave_other_lengths_pass_through() {
        assert_eq!(format_chave(""), "");
        assert_eq!(format_chave("123"), "123");
        assert_eq!(format_chave(&"9".repeat(45)), "9".repeat(45));
    }
}
