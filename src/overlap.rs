//! The overlap record shared by the filter and the graph builder, and the
//! `reverse_end` read-end-naming convention the whole assembler pivots on.

use crate::error::GraphError;

/// One pairwise overlap between two reads, as produced by the aligner and
/// consumed (after filtering) by the graph builder.
///
/// `score` is conventionally the negative overlap length. `g_strand == 1`
/// means the alignment is reversed; callers must swap `g_start`/`g_end`
/// before interpreting the overlap geometrically (see [`crate::graph::builder`]).
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapRecord {
    pub f_id: String,
    pub g_id: String,
    pub score: i64,
    pub identity: f64,
    pub f_strand: i32,
    pub f_start: i64,
    pub f_end: i64,
    pub f_len: i64,
    pub g_strand: i32,
    pub g_start: i64,
    pub g_end: i64,
    pub g_len: i64,
    /// Trailing tag column (`overlap`, `contains`, ...), present on filter
    /// input/output lines but not required for the graph builder's
    /// 12-column overlap-file format.
    pub tag: Option<String>,
}

impl OverlapRecord {
    /// Parse a whitespace-split overlap line: `f_id g_id score identity
    /// f_strand f_start f_end f_len g_strand g_start g_end g_len [tag]`.
    pub fn parse(line: &str) -> Result<Self, GraphError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 12 {
            return Err(GraphError::MalformedOverlap {
                line: 0,
                message: format!("expected at least 12 columns, got {}", fields.len()),
            });
        }
        let bad = |what: &str| GraphError::MalformedOverlap {
            line: 0,
            message: format!("could not parse {what}"),
        };
        Ok(OverlapRecord {
            f_id: fields[0].to_string(),
            g_id: fields[1].to_string(),
            score: fields[2].parse().map_err(|_| bad("score"))?,
            identity: fields[3].parse().map_err(|_| bad("identity"))?,
            f_strand: fields[4].parse().map_err(|_| bad("f_strand"))?,
            f_start: fields[5].parse().map_err(|_| bad("f_start"))?,
            f_end: fields[6].parse().map_err(|_| bad("f_end"))?,
            f_len: fields[7].parse().map_err(|_| bad("f_len"))?,
            g_strand: fields[8].parse().map_err(|_| bad("g_strand"))?,
            g_start: fields[9].parse().map_err(|_| bad("g_start"))?,
            g_end: fields[10].parse().map_err(|_| bad("g_end"))?,
            g_len: fields[11].parse().map_err(|_| bad("g_len"))?,
            tag: fields.get(12).map(|s| s.to_string()),
        })
    }
}

/// Flip a read-end name: `<id>:B <-> <id>:E`, and `"NA" -> "NA"`.
///
/// Every other shape is a malformed node name and is an error, not a
/// silently-tolerated case (§7 "Malformed input" in the design: bad
/// node-name format is fatal).
pub fn reverse_end(node_name: &str) -> Result<String, GraphError> {
    if node_name == "NA" {
        return Ok("NA".to_string());
    }
    if node_name.len() < 2 || !(node_name.ends_with(":B") || node_name.ends_with(":E")) {
        return Err(GraphError::InvalidNodeName(node_name.to_string()));
    }
    let (id, end) = node_name
        .rsplit_once(':')
        .ok_or_else(|| GraphError::InvalidNodeName(node_name.to_string()))?;
    let new_end = if end == "E" { "B" } else { "E" };
    Ok(format!("{id}:{new_end}"))
}

/// `(v, w) -> (reverse_end(w), reverse_end(v))`, the twin of a directed edge.
pub fn reverse_edge(v: &str, w: &str) -> Result<(String, String), GraphError> {
    Ok((reverse_end(w)?, reverse_end(v)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_end_flips_b_and_e() {
        assert_eq!(reverse_end("r1:B").unwrap(), "r1:E");
        assert_eq!(reverse_end("r1:E").unwrap(), "r1:B");
    }

    #[test]
    fn reverse_end_na_is_fixed_point() {
        assert_eq!(reverse_end("NA").unwrap(), "NA");
    }

    #[test]
    fn reverse_end_is_involutive() {
        for name in ["read42:B", "read42:E", "NA"] {
            let once = reverse_end(name).unwrap();
            let twice = reverse_end(&once).unwrap();
            assert_eq!(twice, name);
        }
    }

    #[test]
    fn reverse_end_rejects_malformed_names() {
        assert!(reverse_end("read42").is_err());
        assert!(reverse_end("read42:X").is_err());
        assert!(reverse_end(":B").is_ok()); // empty id is syntactically fine
    }

    #[test]
    fn parse_accepts_twelve_columns() {
        let line = "r1 r2 -100 99.0 0 0 100 500 0 400 500 500 overlap";
        let rec = OverlapRecord::parse(line).unwrap();
        assert_eq!(rec.f_id, "r1");
        assert_eq!(rec.g_id, "r2");
        assert_eq!(rec.score, -100);
        assert_eq!(rec.tag.as_deref(), Some("overlap"));
    }

    #[test]
    fn parse_rejects_short_lines() {
        assert!(OverlapRecord::parse("r1 r2 -100").is_err());
    }
}
