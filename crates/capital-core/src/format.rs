//! Display formatting for currency and percentages.

/// `$1,234.56`, with a leading minus for negative amounts
pub fn format_usd(amount: f64) -> String {
    let cents = to_cents(amount);
    let sign = if cents < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(cents.abs() / 100.0))
}

/// Like `format_usd` but always signed: `+$1,000.00` / `-$1,000.00`
pub fn format_signed_usd(amount: f64) -> String {
    if to_cents(amount) >= 0.0 {
        format!("+{}", format_usd(amount))
    } else {
        format_usd(amount)
    }
}

/// Whole cents; anything that rounds to zero is positive zero
fn to_cents(amount: f64) -> f64 {
    let cents = (amount * 100.0).round();
    if cents == 0.0 {
        0.0
    } else {
        cents
    }
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{cents}")
}
