//! Stage 2: per-file selection pass, run after the stage-1 barrier has
//! resolved the global ignore/contained sets. Overlaps are bucketed by
//! which end of the first read (`f`) they touch — 5' (`f_start == 0`) or
//! 3' (`f_end == f_len`) — and only the best-scoring ones in each bucket
//! survive, up to `bestn` and a coverage-range cutoff.

use std::path::Path;

use indexmap::IndexSet;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::overlap::OverlapRecord;

#[derive(PartialEq, Eq, Hash, Clone, Copy)]
enum End {
    Five,
    Three,
}

fn end_of(record: &OverlapRecord) -> Option<End> {
    if record.f_start == 0 {
        Some(End::Five)
    } else if record.f_end == record.f_len {
        Some(End::Three)
    } else {
        None
    }
}

/// `g_len - (g_end - g_start)`: how much of `g` the alignment leaves
/// uncovered. Ported verbatim from `ovlp_filter.py`'s `m_range`, used both
/// as the secondary sort key and the stopping-rule metric.
fn m_range(record: &OverlapRecord) -> i64 {
    record.g_len - (record.g_end - record.g_start)
}

pub fn filter_file(
    path: &Path,
    cfg: &FilterConfig,
    ignore: &IndexSet<String>,
    contained: &IndexSet<String>,
) -> Result<Vec<OverlapRecord>, FilterError> {
    let records = super::parse_overlap_file(path, cfg.stream)?;
    let mut accepted = Vec::new();

    let mut by_bucket: indexmap::IndexMap<(String, u8), Vec<OverlapRecord>> = indexmap::IndexMap::new();
    for record in records {
        if ignore.contains(&record.f_id)
            || ignore.contains(&record.g_id)
            || contained.contains(&record.f_id)
            || contained.contains(&record.g_id)
        {
            continue;
        }
        let Some(end) = end_of(&record) else { continue };
        let bucket_tag = match end {
            End::Five => 0u8,
            End::Three => 1u8,
        };
        by_bucket
            .entry((record.f_id.clone(), bucket_tag))
            .or_default()
            .push(record);
    }

    for ((_, _), mut group) in by_bucket {
        // Primary key `score` (negative overlap length, so ascending score
        // is longest-overlap-first), secondary key `m_range = g_len - (g_end
        // - g_start)` ascending, matching `ovlp_filter.py`'s
        // `left.sort()` over `(-overlap_len, m_range, line)`. `sort_by_key`
        // is stable, so equal-key records keep their original line order as
        // the implicit third key.
        group.sort_by_key(|r| (r.score, m_range(r)));

        // The source's stopping rule appends a candidate, then breaks once
        // `i >= bestn && m_range > 1000`.
        for (i, record) in group.into_iter().enumerate() {
            let mr = m_range(&record);
            if i >= cfg.bestn && mr > 1000 {
                break;
            }
            accepted.push(record);
        }
    }

    Ok(accepted)
}
