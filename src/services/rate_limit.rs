use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use rusqlite::Connection;

use crate::db::queries;

/// 5 requests per 15-minute fixed window, per endpoint scope and client.
pub const WINDOW_MINUTES: u32 = 15;
pub const MAX_REQUESTS: i64 = 5;

fn window_start(now: &NaiveDateTime) -> String {
    let floored_minute = now.minute() - now.minute() % WINDOW_MINUTES;
    format!(
        "{} {:02}:{:02}:00",
        now.format("%Y-%m-%d"),
        now.hour(),
        floored_minute
    )
}

/// Records one request and reports whether the client is still under the cap
/// for the current window. Stale windows are pruned on the way through.
pub fn check(
    conn: &Connection,
    scope: &str,
    client: &str,
    now: &NaiveDateTime,
) -> anyhow::Result<bool> {
    let cutoff = window_start(&(*now - Duration::minutes(2 * WINDOW_MINUTES as i64)));
    queries::prune_rate_windows(conn, &cutoff)?;

    let count = queries::bump_rate_limit(conn, scope, client, &window_start(now))?;
    Ok(count <= MAX_REQUESTS)
}

pub fn check_now(conn: &Connection, scope: &str, client: &str) -> anyhow::Result<bool> {
    check(conn, scope, client, &Utc::now().naive_utc())
}
