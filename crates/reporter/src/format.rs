use core_types::money::round2;
use rust_decimal::Decimal;

/// Formats an amount with two decimals and comma thousands separators,
/// e.g. `1,234,567.80`.
pub fn amount(value: Decimal) -> String {
    let mut rounded = round2(value);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Formats a percentage, e.g. `20.00%`.
pub fn percent(value: Decimal) -> String {
    let mut rounded = round2(value);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    format!("{rounded}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(amount(dec!(1234567.8)), "1,234,567.80");
        assert_eq!(amount(dec!(999.999)), "1,000.00");
        assert_eq!(amount(dec!(12)), "12.00");
        assert_eq!(amount(dec!(0)), "0.00");
    }

    #[test]
    fn keeps_the_sign() {
        assert_eq!(amount(dec!(-4321.5)), "-4,321.50");
        assert_eq!(amount(dec!(-0.001)), "0.00");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(percent(dec!(20)), "20.00%");
        assert_eq!(percent(dec!(-3.456)), "-3.46%");
    }
}
