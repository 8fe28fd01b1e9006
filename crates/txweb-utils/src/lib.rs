//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a digit string with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Round half away from zero to a fixed scale
fn round_money(amount: Decimal, decimal_places: u32) -> Decimal {
    let mut value = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(decimal_places);
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value
}

/// Format an amount as `$1,234.50` with a fixed number of decimal places
pub fn format_money(amount: Decimal, symbol: &str, decimal_places: u32) -> String {
    let value = round_money(amount, decimal_places);
    let text = value.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text.clone(), None),
    };
    let sign = if value.is_sign_negative() { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}{}.{}", sign, symbol, format_number(int_part), frac),
        None => format!("{}{}{}", sign, symbol, format_number(int_part)),
    }
}

/// Format a summary total as `$1234.50` or `$-30.13`: no grouping, sign after the symbol
pub fn format_summary_amount(amount: Decimal, symbol: &str, decimal_places: u32) -> String {
    format!("{}{}", symbol, round_money(amount, decimal_places))
}

/// Escape text for safe inclusion in HTML element content and attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cut text to at most `max_chars` characters, ending with an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}
