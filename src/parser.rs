//! This module contains the parsing functions used at startup.
//! It handles the suffix list, the target URL, duration flags and opening the wordlist.

use crate::error::ConfigError;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

/// Parses a comma-separated suffix list into a sorted list of unique suffixes.
///
/// An empty list yields a single empty suffix, so every word is tried as-is.
/// Suffixes are not trimmed; `".php, .txt"` yields `" .txt"` and `".php"`.
pub fn parse_suffix_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Normalizes the target so it ends in exactly one slash.
pub fn normalize_target(target: &str) -> String {
    format!("{}/", target.trim_end_matches('/'))
}

/// Parses a duration such as `10s`, `500ms` or `1m30s`.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`; values may be
/// fractional. A bare integer is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut nanos = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            return Err(format!("invalid duration {input:?}"));
        }
        let value: f64 = rest[..num_end]
            .parse()
            .map_err(|_| format!("invalid duration {input:?}"))?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration {input:?}")),
            unit => return Err(format!("unknown unit {unit:?} in duration {input:?}")),
        };
        nanos += value * scale;
        rest = &rest[unit_end..];
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// An opened wordlist, either a file or standard input.
pub struct Wordlist {
    /// Name used when reporting read errors.
    pub name: String,
    pub reader: Box<dyn AsyncBufRead + Unpin + Send>,
}

/// Opens the wordlist at `path`, or standard input when `path` is `-`.
pub async fn open_wordlist(path: &str) -> Result<Wordlist, ConfigError> {
    if path == "-" {
        return Ok(Wordlist {
            name: "/dev/stdin".to_string(),
            reader: Box::new(BufReader::new(tokio::io::stdin())),
        });
    }

    let file = File::open(path)
        .await
        .map_err(|source| ConfigError::OpenWordlist {
            path: path.to_string(),
            source,
        })?;
    Ok(Wordlist {
        name: path.to_string(),
        reader: Box::new(BufReader::new(file)),
    })
}
