//! Vault security report.
//!
//! Computed on decrypted items inside the client; nothing here is persisted.

use std::collections::HashMap;

use serde::Serialize;

use crate::codec::OpenedItem;

/// Password hygiene summary for one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityReport {
    /// Items that decrypted successfully.
    pub total: usize,
    /// Items whose password is shorter than the configured threshold,
    /// measured in Unicode scalar values.
    pub weak: usize,
    /// Items whose password is also used by at least one other item.
    pub reused: usize,
    /// `total - weak - reused`, floored at zero.
    pub safe: usize,
    /// Items excluded because they failed to decrypt.
    pub undecryptable: usize,
    /// 0..=100. An empty vault scores 0.
    pub score: u8,
}

/// Build a report from a batch of opened items.
///
/// Password length is counted in `char`s, so a non-BMP character such as an
/// emoji counts once rather than as a surrogate pair.
pub fn security_report(items: &[OpenedItem], weak_password_len: usize) -> SecurityReport {
    let passwords: Vec<&str> = items
        .iter()
        .filter_map(|item| item.fields.as_ref().ok())
        .map(|fields| fields.password.as_str())
        .collect();

    let total = passwords.len();
    let weak = passwords
        .iter()
        .filter(|p| p.chars().count() < weak_password_len)
        .count();

    let mut uses: HashMap<&str, usize> = HashMap::new();
    for p in passwords.iter().filter(|p| !p.is_empty()) {
        *uses.entry(*p).or_default() += 1;
    }
    let reused: usize = uses.values().filter(|&&n| n > 1).sum();

    let score = if total == 0 {
        0
    } else {
        let t = total as f64;
        let raw = 100.0 - (weak as f64 / t) * 40.0 - (reused as f64 / t) * 30.0;
        raw.round().max(0.0) as u8
    };

    SecurityReport {
        total,
        weak,
        reused,
        safe: total.saturating_sub(weak + reused),
        undecryptable: items.len() - total,
        score,
    }
}
