use std::fmt;

/// Parse a user-submitted timestamp into whole seconds.
///
/// `text` follows `[hh:]mm:]ss` (e.g. `2:49`, `5:18:18`). A leading `+`
/// makes the value relative to `relative_to` (rejected when no base is
/// given). The sentinel `-1` resolves to `total_duration` ("to the end")
/// and is rejected when no duration is given. Returns `None` on any
/// malformed input.
pub fn parse_timestamp(
    text: &str,
    relative_to: Option<u64>,
    total_duration: Option<u64>,
) -> Option<u64> {
    if text == "-1" {
        return total_duration;
    }

    if let Some(rest) = text.strip_prefix('+') {
        let base = relative_to?;
        return parse_plain(rest).map(|s| base + s);
    }

    parse_plain(text)
}

/// `hh:mm:ss` segments mapped right-to-left with multipliers 1, 60, 3600.
/// At most three segments, each a bare non-negative integer.
fn parse_plain(text: &str) -> Option<u64> {
    const UNIT: [u64; 3] = [1, 60, 3600];

    let segments: Vec<&str> = text.split(':').collect();
    if segments.len() > 3 {
        return None;
    }

    let mut total = 0u64;
    for (segment, unit) in segments.iter().rev().zip(UNIT) {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        total += segment.parse::<u64>().ok()? * unit;
    }
    Some(total)
}

/// Clip end position as configured or entered, kept symbolic until the
/// track duration is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSpec {
    /// The `-1` sentinel: extend to the end of the source audio.
    ToEnd,
    /// Absolute position in the source, in seconds.
    Absolute(u64),
    /// Offset from the clip start, in seconds.
    Relative(u64),
}

impl EndSpec {
    /// Syntax-only parse; no duration is needed (or consulted) here.
    pub fn parse(text: &str) -> Option<Self> {
        if text == "-1" {
            return Some(Self::ToEnd);
        }
        if let Some(rest) = text.strip_prefix('+') {
            return parse_plain(rest).map(Self::Relative);
        }
        parse_plain(text).map(Self::Absolute)
    }

    /// Resolve to an absolute second count for one concrete track.
    pub fn resolve(self, start: u64, duration: u64) -> u64 {
        match self {
            Self::ToEnd => duration,
            Self::Absolute(seconds) => seconds,
            Self::Relative(offset) => start + offset,
        }
    }

    pub fn is_relative(self) -> bool {
        matches!(self, Self::Relative(_))
    }
}

impl fmt::Display for EndSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToEnd => write!(f, "-1"),
            Self::Absolute(seconds) => write!(f, "{seconds}"),
            Self::Relative(offset) => write!(f, "+{offset}"),
        }
    }
}
