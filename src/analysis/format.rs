//! Number formatting for report statements

/// `1250000.0` → `"$1,250,000.00"`, `-5.5` → `"-$5.50"`
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 && format!("{:.2}", value.abs()) != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{}${}", sign, thousands(value.abs()))
}

/// Two decimals with comma thousands separators
pub fn thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}
