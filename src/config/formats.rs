//! Human-readable duration and byte-size literals.

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<value>[0-9]+(?:\.[0-9]+)?)\s*(?P<unit>[a-z]+)$")
            .expect("duration pattern is valid")
    })
}

/// Split `"10 ms"` style text into its number and lowercase unit.
fn split_literal(text: &str) -> Option<(String, String)> {
    let text = text.trim().to_ascii_lowercase();
    let caps = duration_pattern().captures(&text)?;
    Some((caps["value"].to_string(), caps["unit"].to_string()))
}

/// Parse durations such as `"500ms"`, `"10s"`, `"1.5 hours"` or `"2d"`.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let (value, unit) = split_literal(text)?;
    let nanos_per_unit: u64 = match unit.as_str() {
        "nanoseconds" | "nanosecond" | "nanos" | "nano" | "ns" => 1,
        "microseconds" | "microsecond" | "micros" | "micro" | "us" => 1_000,
        "milliseconds" | "millisecond" | "millis" | "milli" | "ms" => 1_000_000,
        "seconds" | "second" | "secs" | "sec" | "s" => 1_000_000_000,
        "minutes" | "minute" | "mins" | "min" | "m" => 60 * 1_000_000_000,
        "hours" | "hour" | "h" => 3_600 * 1_000_000_000,
        "days" | "day" | "d" => 86_400 * 1_000_000_000,
        _ => return None,
    };

    match value.parse::<u64>() {
        Ok(whole) => whole.checked_mul(nanos_per_unit).map(Duration::from_nanos),
        Err(_) => {
            let fractional: f64 = value.parse().ok()?;
            Duration::try_from_secs_f64(fractional * nanos_per_unit as f64 / 1e9).ok()
        }
    }
}

/// Parse byte sizes such as `"512"`, `"1k"` (1024), `"1kb"` (1000) or `"2 GiB"`.
///
/// Decimal units (`kb`, `mb`, ...) are powers of 1000; single-letter and
/// binary units (`k`, `ki`, `kib`, ...) are powers of 1024.
pub fn parse_byte_size(text: &str) -> Option<u128> {
    let trimmed = text.trim();
    if let Ok(bytes) = trimmed.parse::<u128>() {
        return Some(bytes);
    }

    let (value, unit) = split_literal(trimmed)?;
    let multiplier: u128 = match unit.as_str() {
        "b" | "byte" | "bytes" => 1,
        "kb" | "kilobyte" | "kilobytes" => 1000,
        "mb" | "megabyte" | "megabytes" => 1000u128.pow(2),
        "gb" | "gigabyte" | "gigabytes" => 1000u128.pow(3),
        "tb" | "terabyte" | "terabytes" => 1000u128.pow(4),
        "pb" | "petabyte" | "petabytes" => 1000u128.pow(5),
        "eb" | "exabyte" | "exabytes" => 1000u128.pow(6),
        "zb" | "zettabyte" | "zettabytes" => 1000u128.pow(7),
        "yb" | "yottabyte" | "yottabytes" => 1000u128.pow(8),
        "k" | "ki" | "kib" | "kibibyte" | "kibibytes" => 1024,
        "m" | "mi" | "mib" | "mebibyte" | "mebibytes" => 1024u128.pow(2),
        "g" | "gi" | "gib" | "gibibyte" | "gibibytes" => 1024u128.pow(3),
        "t" | "ti" | "tib" | "tebibyte" | "tebibytes" => 1024u128.pow(4),
        "p" | "pi" | "pib" | "pebibyte" | "pebibytes" => 1024u128.pow(5),
        "e" | "ei" | "eib" | "exbibyte" | "exbibytes" => 1024u128.pow(6),
        "z" | "zi" | "zib" | "zebibyte" | "zebibytes" => 1024u128.pow(7),
        "y" | "yi" | "yib" | "yobibyte" | "yobibytes" => 1024u128.pow(8),
        _ => return None,
    };

    match value.parse::<u128>() {
        Ok(whole) => whole.checked_mul(multiplier),
        Err(_) => {
            let fractional: f64 = value.parse().ok()?;
            Some((fractional * multiplier as f64).round() as u128)
        }
    }
}
