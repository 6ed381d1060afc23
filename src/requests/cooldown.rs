//! Resubmission cooldown after a rejected join request

use chrono::{DateTime, Duration, Utc};

use super::models::CooldownInfo;

/// Minutes a rejected requester must wait before asking again
pub const COOLDOWN_MINUTES: i64 = 30;

/// Whole minutes left before a request revoked at `revoked_at` may be resent,
/// rounded up. `None` once the cooldown has elapsed.
pub fn remaining_cooldown_minutes(revoked_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
    let elapsed = (now - revoked_at).max(Duration::zero());
    let remaining = Duration::minutes(COOLDOWN_MINUTES) - elapsed;
    if remaining <= Duration::zero() {
        return None;
    }

    let remaining_ms = remaining.num_milliseconds();
    Some((remaining_ms + 59_999) / 60_000)
}

/// Parses a stored RFC 3339 revocation stamp
pub fn parse_revoked_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Cooldown summary for a revoked request's listing entry.
/// A missing or unreadable stamp counts as elapsed.
pub fn cooldown_info(revoked_at: Option<&str>, now: DateTime<Utc>) -> CooldownInfo {
    match revoked_at
        .and_then(parse_revoked_at)
        .and_then(|at| remaining_cooldown_minutes(at, now))
    {
        Some(minutes) => CooldownInfo {
            can_resend: false,
            remaining_minutes: minutes,
        },
        None => CooldownInfo {
            can_resend: true,
            remaining_minutes: 0,
        },
    }
}
