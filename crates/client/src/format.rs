//! Display formatting for amounts, addresses, and time.

use num_bigint::BigUint;
use num_traits::Zero;

/// Decimals of the STRK token.
const STRK_DECIMALS: u32 = 18;

fn strk_scale() -> BigUint {
    BigUint::from(10u64).pow(STRK_DECIMALS)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a smallest-unit amount as STRK with up to 4 fraction digits.
pub fn format_strk_amount(amount: &BigUint) -> String {
    let scale = strk_scale();
    let whole = amount / &scale;
    let frac = amount % &scale;

    let whole_str = group_thousands(&whole.to_string());

    let mut frac_str = frac.to_string();
    while frac_str.len() < STRK_DECIMALS as usize {
        frac_str.insert(0, '0');
    }
    frac_str.truncate(4);
    let trimmed = frac_str.trim_end_matches('0');

    if trimmed.is_empty() {
        whole_str
    } else {
        format!("{whole_str}.{trimmed}")
    }
}

/// Parse a decimal STRK amount into the smallest unit, flooring extra
/// precision. Unparseable or negative input yields zero.
pub fn parse_strk_amount(s: &str) -> BigUint {
    let trimmed = s.trim();
    let (whole_str, frac_str) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole_str.is_empty() && frac_str.is_empty() {
        return BigUint::zero();
    }
    let digits_only =
        |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(whole_str.is_empty() || digits_only(whole_str))
        || !(frac_str.is_empty() || digits_only(frac_str))
    {
        return BigUint::zero();
    }

    let whole = if whole_str.is_empty() {
        BigUint::zero()
    } else {
        whole_str.parse().unwrap_or_else(|_| BigUint::zero())
    };

    let mut frac_digits: String = frac_str.chars().take(STRK_DECIMALS as usize).collect();
    while frac_digits.len() < STRK_DECIMALS as usize {
        frac_digits.push('0');
    }
    let frac = frac_digits.parse().unwrap_or_else(|_| BigUint::zero());

    whole * strk_scale() + frac
}

/// Abbreviate an address as `0x1234...abcd`.
pub fn shorten_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Human-readable countdown until `end_time`.
pub fn format_time_remaining(end_time: Option<u64>, now: u64) -> String {
    let end = match end_time {
        None | Some(0) => return "N/A".to_string(),
        Some(end) => end,
    };
    if end <= now {
        return "Ended".to_string();
    }

    let remaining = end - now;
    let days = remaining / 86_400;
    let hours = (remaining % 86_400) / 3_600;
    let minutes = (remaining % 3_600) / 60;
    let seconds = remaining % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Render a duration in seconds as hours/minutes.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Duration units accepted on auction creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
}

impl std::str::FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes" => Ok(DurationUnit::Minutes),
            "hours" => Ok(DurationUnit::Hours),
            "days" => Ok(DurationUnit::Days),
            other => Err(format!("unknown duration unit: {other}")),
        }
    }
}

pub fn duration_to_seconds(value: u64, unit: DurationUnit) -> u64 {
    match unit {
        DurationUnit::Minutes => value * 60,
        DurationUnit::Hours => value * 3_600,
        DurationUnit::Days => value * 86_400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_whole_amounts() {
        assert_eq!(format_strk_amount(&parse_strk_amount("1")), "1");
        assert_eq!(format_strk_amount(&parse_strk_amount("1234567")), "1,234,567");
        assert_eq!(format_strk_amount(&BigUint::zero()), "0");
    }

    #[test]
    fn format_fractional_amounts() {
        assert_eq!(format_strk_amount(&parse_strk_amount("1.5")), "1.5");
        assert_eq!(format_strk_amount(&parse_strk_amount("0.1234")), "0.1234");
        // Fifth digit and beyond is truncated.
        assert_eq!(format_strk_amount(&parse_strk_amount("0.123456")), "0.1234");
    }

    #[test]
    fn parse_floors_and_rejects_garbage() {
        let one_strk = BigUint::from(10u64).pow(18);
        assert_eq!(parse_strk_amount("1"), one_strk);
        assert_eq!(parse_strk_amount("1.0"), one_strk);
        assert_eq!(
            parse_strk_amount("2.5"),
            BigUint::from(25u64) * BigUint::from(10u64).pow(17)
        );
        assert_eq!(parse_strk_amount(""), BigUint::zero());
        assert_eq!(parse_strk_amount("abc"), BigUint::zero());
        assert_eq!(parse_strk_amount("-5"), BigUint::zero());
        // Sub-wei precision floors away.
        assert_eq!(
            parse_strk_amount("0.0000000000000000001"),
            BigUint::zero()
        );
    }

    #[test]
    fn shorten_address_variants() {
        assert_eq!(shorten_address(""), "");
        assert_eq!(shorten_address("0x1234"), "0x1234");
        let long = format!("0x{}", "ab".repeat(32));
        let short = shorten_address(&long);
        assert_eq!(short, "0xabab...abab");
    }

    #[test]
    fn time_remaining_buckets() {
        assert_eq!(format_time_remaining(None, 100), "N/A");
        assert_eq!(format_time_remaining(Some(0), 100), "N/A");
        assert_eq!(format_time_remaining(Some(50), 100), "Ended");
        assert_eq!(format_time_remaining(Some(130), 100), "30s");
        assert_eq!(format_time_remaining(Some(100 + 90), 100), "1m 30s");
        assert_eq!(format_time_remaining(Some(100 + 3_660), 100), "1h 1m 0s");
        assert_eq!(
            format_time_remaining(Some(100 + 2 * 86_400 + 3_600), 100),
            "2d 1h 0m"
        );
    }

    #[test]
    fn duration_conversions() {
        assert_eq!(duration_to_seconds(5, DurationUnit::Minutes), 300);
        assert_eq!(duration_to_seconds(2, DurationUnit::Hours), 7_200);
        assert_eq!(duration_to_seconds(1, DurationUnit::Days), 86_400);
        assert_eq!(format_duration(7_380), "2h 3m");
        assert_eq!(format_duration(300), "5m");
    }
}
