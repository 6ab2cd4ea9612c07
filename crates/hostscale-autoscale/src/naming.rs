//! Clone naming.
//!
//! New hosts continue the group's existing numbering: `web07.example.com`
//! in a group yields clones `web08`, `web09`, ... Names are derived from
//! the listed snapshot only, so the same group and amount always produce
//! the same names.
//!
//! ```text
//! display   = name if set, else hostname
//! stripped  = display up to the first '.'
//! prefix    = stripped minus its trailing ASCII digits (the suffix)
//! seed      = suffix of the first host (most recent) whose stripped
//!             display name contains prefix
//! next      = seed + 1, zero-padded to the seed's width, never truncated
//!             ("2" when the seed is empty)
//! ```

use hostscale_state::HostRecord;

/// Keep only the portion of a host name before the first `.`.
pub fn strip_domain(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Split a name into `(prefix, numeric_suffix)`. The suffix is the longest
/// run of ASCII digits at the end of the name and may be empty.
pub fn split_suffix(name: &str) -> (&str, &str) {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    (prefix, &name[prefix.len()..])
}

/// Increment a decimal suffix, keeping its zero padding.
///
/// The result has the same width as the input unless the number itself
/// needs more digits (`"009"` → `"010"`, `"999"` → `"1000"`). An empty
/// suffix starts the sequence at `"2"`: the unnumbered host is the first.
pub fn next_suffix(prev: &str) -> String {
    if prev.is_empty() {
        return "2".to_string();
    }
    let mut digits: Vec<u8> = prev.bytes().collect();
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return String::from_utf8_lossy(&digits).into_owned();
        }
    }
    // Every digit carried over.
    let mut grown = String::with_capacity(digits.len() + 1);
    grown.push('1');
    grown.push_str(&String::from_utf8_lossy(&digits));
    grown
}

/// Infinite sequence of clone hostnames for a group.
#[derive(Debug, Clone)]
pub struct NameSequence {
    prefix: String,
    suffix: String,
}

impl NameSequence {
    /// Derive the sequence from the base host and the group it belongs to,
    /// listed most-recent-first.
    pub fn for_group(base: &HostRecord, group: &[HostRecord]) -> Self {
        let (prefix, _) = split_suffix(strip_domain(base.display_name()));

        let seed = group
            .iter()
            .map(|h| strip_domain(h.display_name()))
            .find(|stripped| stripped.contains(prefix))
            .map(|stripped| split_suffix(stripped).1)
            .unwrap_or("");

        Self {
            prefix: prefix.to_string(),
            suffix: seed.to_string(),
        }
    }

    /// Prefix shared by every generated hostname.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Iterator for NameSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.suffix = next_suffix(&self.suffix);
        Some(format!("{}{}", self.prefix, self.suffix))
    }
}
