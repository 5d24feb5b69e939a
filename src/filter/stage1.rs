//! Stage 1: per-file classification pass. Builds this file's contribution
//! to the global ignore set (reads too short or too low-identity to trust
//! at all) and contained set (reads a single alignment fully spans, so
//! every overlap naming them as the spanned read is redundant).

use std::path::Path;

use indexmap::IndexSet;

use crate::config::FilterConfig;
use crate::error::FilterError;

const CONTAINMENT_FUZZ: i64 = 100;

#[derive(Default)]
pub struct Stage1Result {
    pub ignore: IndexSet<String>,
    pub contained: IndexSet<String>,
}

/// A read is "fully spanned" by this alignment if the aligned region
/// reaches within `CONTAINMENT_FUZZ` of both of its own ends.
fn fully_spans(start: i64, end: i64, len: i64) -> bool {
    start <= CONTAINMENT_FUZZ && len - end <= CONTAINMENT_FUZZ
}

pub fn classify_file(path: &Path, cfg: &FilterConfig) -> Result<Stage1Result, FilterError> {
    let records = super::parse_overlap_file(path, cfg.stream)?;
    let mut result = Stage1Result::default();

    for record in &records {
        if record.f_len < cfg.min_len {
            result.ignore.insert(record.f_id.clone());
        }
        if record.g_len < cfg.min_len {
            result.ignore.insert(record.g_id.clone());
        }
        if record.identity < cfg.min_idt {
            continue;
        }

        let (mut g_start, mut g_end) = (record.g_start, record.g_end);
        if record.g_strand == 1 {
            std::mem::swap(&mut g_start, &mut g_end);
        }

        let f_spanned = fully_spans(record.f_start, record.f_end, record.f_len);
        let g_spanned = fully_spans(g_start.min(g_end), g_start.max(g_end), record.g_len);

        // When both ends look fully spanned (near-identical-length reads),
        // neither is meaningfully "contained" by the other; only act when
        // exactly one side is spanned.
        if f_spanned && !g_spanned {
            result.contained.insert(record.f_id.clone());
        } else if g_spanned && !f_spanned {
            result.contained.insert(record.g_id.clone());
        }
    }

    Ok(result)
}
