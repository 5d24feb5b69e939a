//! Two-pass streaming overlap filter, ported from `falcon_kit.mains.ovlp_filter`.
//!
//! Stage 1 scans every input file once to build the global ignore set
//! (reads too short or too poorly aligned to trust) and contained set
//! (reads wholly spanned by another read's alignment). Stage 2 rescans
//! with those sets resolved, keeping only the best-N overlaps per read end
//! within the configured coverage bounds. The two stages are separated by
//! a barrier: stage 2 cannot start on any file until stage 1 has finished
//! on all of them, since the ignore/contained sets are global.

pub mod stage1;
pub mod stage2;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rayon::prelude::*;
use tempfile::NamedTempFile;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::overlap::OverlapRecord;

/// A source of overlap lines for one input file: either the whole file
/// slurped into memory (`stream = false`, the default — faster when
/// per-file size is modest) or read line-by-line (`stream = true`, for
/// files too large to slurp comfortably).
pub trait OverlapLineSource {
    fn lines(&self) -> Result<Box<dyn Iterator<Item = io::Result<String>>>, FilterError>;
}

pub struct SlurpedLines {
    pub path: PathBuf,
}

impl OverlapLineSource for SlurpedLines {
    fn lines(&self) -> Result<Box<dyn Iterator<Item = io::Result<String>>>, FilterError> {
        let content = std::fs::read_to_string(&self.path)?;
        let lines: Vec<io::Result<String>> = content.lines().map(|l| Ok(l.to_string())).collect();
        Ok(Box::new(lines.into_iter()))
    }
}

pub struct StreamedLines {
    pub path: PathBuf,
}

impl OverlapLineSource for StreamedLines {
    fn lines(&self) -> Result<Box<dyn Iterator<Item = io::Result<String>>>, FilterError> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file).lines()))
    }
}

fn source_for(path: PathBuf, stream: bool) -> Box<dyn OverlapLineSource + Send> {
    if stream {
        Box::new(StreamedLines { path })
    } else {
        Box::new(SlurpedLines { path })
    }
}

fn parse_records(path: &Path, stream: bool) -> Result<Vec<OverlapRecord>, FilterError> {
    let source = source_for(path.to_path_buf(), stream);
    let mut records = Vec::new();
    for (lineno, line) in source.lines()?.enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            continue;
        }
        let record = OverlapRecord::parse(trimmed).map_err(|e| FilterError::MalformedLine {
            file: path.to_path_buf(),
            line: lineno + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Run the full two-pass filter over every file in `las_fofn`, writing the
/// accepted overlaps to `cfg.out_fn`. The worker pool used for each stage is
/// bounded by `min(n_core, num_files)`; `n_core == 0` (or `cfg.debug`) runs
/// both stages on the calling thread, which is what the single-threaded
/// `--debug` flag is for.
pub fn run_filter(cfg: &FilterConfig) -> Result<(), FilterError> {
    let fofn_path = PathBuf::from(&cfg.las_fofn);
    let files = crate::container::read_fofn_paths(&fofn_path)
        .map_err(|e| FilterError::Worker {
            file: fofn_path.clone(),
            message: e.to_string(),
        })?;

    let pool_size = if cfg.debug { 1 } else { cfg.n_core.max(1).min(files.len().max(1)) };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .build()
        .map_err(|e| FilterError::Worker {
            file: fofn_path.clone(),
            message: e.to_string(),
        })?;

    // Stage 1: classify every file, then merge into global sets. This is
    // the barrier; stage 2 below only starts once every stage1 result is in.
    let stage1_results: Vec<Result<stage1::Stage1Result, FilterError>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| stage1::classify_file(path, cfg))
            .collect()
    });

    let mut ignore: IndexSet<String> = IndexSet::new();
    let mut contained: IndexSet<String> = IndexSet::new();
    for result in stage1_results {
        let r = result?;
        ignore.extend(r.ignore);
        contained.extend(r.contained);
    }

    let stage2_results: Vec<Result<Vec<OverlapRecord>, FilterError>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| stage2::filter_file(path, cfg, &ignore, &contained))
            .collect()
    });

    let out_path = PathBuf::from(&cfg.out_fn);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = NamedTempFile::new_in(out_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new(".")))?;
    {
        use std::io::Write;
        // Written in submission order (files.iter() order), not completion
        // order, so the output is deterministic regardless of worker timing.
        for result in stage2_results {
            for record in result? {
                writeln!(
                    tmp,
                    "{} {} {} {:.2} {} {} {} {} {} {} {} {}",
                    record.f_id,
                    record.g_id,
                    record.score,
                    record.identity,
                    record.f_strand,
                    record.f_start,
                    record.f_end,
                    record.f_len,
                    record.g_strand,
                    record.g_start,
                    record.g_end,
                    record.g_len
                )?;
            }
        }
        writeln!(tmp, "-")?;
    }
    tmp.persist(&out_path).map_err(|e| FilterError::Worker {
        file: out_path.clone(),
        message: e.to_string(),
    })?;

    Ok(())
}

pub(crate) use parse_records as parse_overlap_file;
