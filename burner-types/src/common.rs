// SPDX-License-Identifier: GPL-3.0-only

//! Formatting helpers shared by the CLI and selection labels

use anyhow::Result;
use num_format::{Locale, ToFormattedString};

/// Convert bytes to human-readable format (e.g., "4.38 GB")
pub fn bytes_to_pretty(bytes: &u64, add_bytes: bool) -> String {
    let mut steps = 0;
    let mut val: f64 = *bytes as f64;

    while val > 1024. && steps <= 8 {
        val /= 1024.;
        steps += 1;
    }

    let unit = match steps {
        0 => "B",
        1 => "KB",
        2 => "MB",
        3 => "GB",
        4 => "TB",
        5 => "PB",
        6 => "EB",
        7 => "ZB",
        8 => "YB",
        _ => "Not Supported",
    };

    if add_bytes {
        let bytes_str = bytes.to_formatted_string(&Locale::en);
        format!("{:.2} {} ({} bytes)", val, unit, bytes_str)
    } else {
        format!("{:.2} {}", val, unit)
    }
}

/// Parse human-readable format to bytes (e.g., "4.38 GB" -> bytes)
pub fn pretty_to_bytes(pretty: &str) -> Result<u64> {
    let split = pretty.split_whitespace().collect::<Vec<&str>>();
    let string_value = split
        .first()
        .ok_or_else(|| anyhow::anyhow!("Invalid input"))?;

    let mut val: f64 = string_value.parse()?;
    let unit = *split
        .last()
        .ok_or_else(|| anyhow::anyhow!("Invalid input"))?;

    let mut steps = match unit {
        "B" => 0,
        "KB" => 1,
        "MB" => 2,
        "GB" => 3,
        "TB" => 4,
        "PB" => 5,
        "EB" => 6,
        "ZB" => 7,
        "YB" => 8,
        _ => return Err(anyhow::anyhow!("Invalid unit: {}", unit)),
    };

    while steps > 0 {
        val *= 1024.;
        steps -= 1;
    }

    Ok(val as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_round_trip() {
        assert_eq!(bytes_to_pretty(&0, false), "0.00 B");
        assert_eq!(bytes_to_pretty(&(2 * 1024 * 1024), false), "2.00 MB");
        assert_eq!(pretty_to_bytes("2.00 MB").unwrap(), 2 * 1024 * 1024);
        assert!(pretty_to_bytes("2.00 parsecs").is_err());
    }
}
