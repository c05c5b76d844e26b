//! Candidate URL generation.
//!
//! Each wordlist line is combined with every suffix and pushed onto the
//! dispatch channel. This is plain string concatenation; malformed lines become
//! malformed URLs and surface as request errors in the workers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

/// Yields `base + line + suffix` for each suffix, in suffix order.
///
/// `base` is expected to already end in exactly one slash.
pub fn candidates<'a>(
    base: &'a str,
    line: &'a str,
    suffixes: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    suffixes
        .iter()
        .map(move |suffix| format!("{base}{line}{suffix}"))
}

/// Turns a raw wordlist line into text, percent-encoding any byte that is not
/// part of a valid UTF-8 sequence.
pub fn decode_line(raw: &[u8]) -> String {
    let mut line = String::with_capacity(raw.len());
    for chunk in raw.utf8_chunks() {
        line.push_str(chunk.valid());
        for byte in chunk.invalid() {
            line.push_str(&format!("%{byte:02X}"));
        }
    }
    line
}

/// Reads `reader` line by line and sends every candidate URL into `tx`.
///
/// Lines end at `\n`, with a trailing `\r` dropped. Returns the number of
/// candidates sent. Stops early without error if every receiver has gone away.
/// A read error ends generation; candidates already sent stay in the channel.
pub async fn dispatch<R>(
    mut reader: R,
    base: &str,
    suffixes: &[String],
    tx: &UnboundedSender<String>,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut sent = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(sent);
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = decode_line(raw);

        for url in candidates(base, &line, suffixes) {
            if tx.send(url).is_err() {
                log::debug!("dispatch channel closed after {sent} candidates");
                return Ok(sent);
            }
            sent += 1;
        }
    }
}
