//! Time-bounded history paging over Discord's id cursors
//!
//! Discord pages history by message id, at most 100 per request, and
//! always returns a page newest first. Ids are snowflakes whose high bits
//! are milliseconds since the Discord epoch, so a time bound becomes an
//! id cursor.

use std::future::Future;

use chrono::{DateTime, Utc};
use murmur_core::{HistoryQuery, Result};

/// First millisecond of 2015, the zero point of Discord snowflakes
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Most messages Discord returns for one history request
pub const PAGE_SIZE: u32 = 100;

/// Anything with a Discord snowflake id
pub trait Snowflaked {
    fn snowflake(&self) -> u64;
}

impl Snowflaked for serenity::model::channel::Message {
    fn snowflake(&self) -> u64 {
        self.id.get()
    }
}

/// Smallest snowflake that could have been minted at `instant`.
///
/// Snowflakes carry 42 bits of milliseconds; instants past that range
/// saturate to the largest id so ordering is preserved.
pub fn snowflake_at(instant: DateTime<Utc>) -> u64 {
    let ms = (instant.timestamp_millis() - DISCORD_EPOCH_MS).max(0) as u64;
    if ms >= 1 << 42 { u64::MAX } else { ms << 22 }
}

/// Which side of the cursor a page is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Messages older than the id; `None` starts at the newest message
    Before(Option<u64>),
    /// Messages newer than the id; 0 starts at the oldest message
    After(u64),
}

/// Page through history until the limit, the far bound or an empty page.
///
/// `fetch` performs one request of at most [`PAGE_SIZE`] messages and
/// returns it newest first, as Discord does. The result is newest first,
/// or oldest first when the query asks for it.
pub async fn collect_pages<T, F, Fut>(query: &HistoryQuery, mut fetch: F) -> Result<Vec<T>>
where
    T: Snowflaked,
    F: FnMut(Cursor, u8) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let limit = query.limit as usize;
    let before = query.before.map(snowflake_at);
    let after = query.after.map(snowflake_at);
    let mut collected: Vec<T> = Vec::with_capacity(limit.min(PAGE_SIZE as usize));

    let mut cursor = if query.is_oldest_first() {
        Cursor::After(after.unwrap_or(0))
    } else {
        Cursor::Before(before)
    };

    while collected.len() < limit {
        let want = (limit - collected.len()).min(PAGE_SIZE as usize);
        let mut page = fetch(cursor, want as u8).await?;
        let exhausted = page.len() < want;
        if page.is_empty() {
            break;
        }

        if let Cursor::After(_) = cursor {
            page.reverse();
        }

        let mut hit_bound = false;
        let mut next = None;
        for item in page {
            let id = item.snowflake();
            let beyond = match cursor {
                Cursor::Before(_) => after.is_some_and(|bound| id <= bound),
                Cursor::After(_) => before.is_some_and(|bound| id >= bound),
            };
            if beyond {
                hit_bound = true;
                break;
            }
            next = Some(id);
            collected.push(item);
            if collected.len() == limit {
                break;
            }
        }

        cursor = match (cursor, next) {
            (Cursor::Before(_), Some(id)) => Cursor::Before(Some(id)),
            (Cursor::After(_), Some(id)) => Cursor::After(id),
            (_, None) => break,
        };

        if hit_bound || exhausted {
            break;
        }
    }

    Ok(collected)
}
