//! Conversion of SNAP temporal edge lists into update streams.
//!
//! SNAP temporal networks are plain text files with one `source destination time` record per
//! line, separated by tabs or spaces, and optional `#` comment lines. Each record becomes an
//! `add` update.

use std::io::{BufRead, Write};
use tempus_api::core::{entities::TemporalEdge, input::EdgeUpdate, EdgeOp};
use tracing::{debug, warn};

use crate::errors::GraphError;

/// Parse one SNAP record. Comments and blank lines yield `None`, as do records whose first
/// three fields are not unsigned integers. Extra fields are ignored.
pub fn parse_snap_line(line: &str) -> Option<TemporalEdge> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split_whitespace().map(|f| f.parse::<u64>().ok());
    let src = fields.next()??;
    let dst = fields.next()??;
    let time = fields.next()??;
    Some(TemporalEdge::new(src, dst, time))
}

/// Write an `add` update for every SNAP record of `reader`. Returns the number of updates
/// written.
pub fn convert_snap<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<usize, GraphError> {
    let mut written = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_snap_line(&line) {
            Some(edge) => {
                writeln!(writer, "{}", EdgeUpdate { op: EdgeOp::Add, edge })?;
                written += 1;
            }
            None => {
                let trimmed = line.trim();
                if !trimmed.is_empty() && !trimmed.starts_with('#') {
                    warn!(line = i + 1, "skipping malformed SNAP record");
                }
            }
        }
    }
    writer.flush()?;
    debug!(written, "converted SNAP edge list");
    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::updates::read_updates;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn parse_records() {
        assert_eq!(
            parse_snap_line("1\t2\t1082040961"),
            Some(TemporalEdge::new(1, 2, 1082040961))
        );
        assert_eq!(parse_snap_line("3 4 5 extra"), Some(TemporalEdge::new(3, 4, 5)));
        assert_eq!(parse_snap_line("# FromNodeId ToNodeId"), None);
        assert_eq!(parse_snap_line("1 2"), None);
        assert_eq!(parse_snap_line("a b c"), None);
    }

    #[test]
    fn converted_output_is_an_update_stream() {
        let snap = "# comment\n1\t2\t10\n2 3 11\n\nbad line here\n3\t1\t12\n";
        let mut out = vec![];
        let written = convert_snap(Cursor::new(snap), &mut out).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "add 1 2 10\nadd 2 3 11\nadd 3 1 12\n");

        let batches = read_updates(Cursor::new(text));
        assert_eq!(batches.additions.len(), 3);
        assert!(batches.deletions.is_empty());
    }
}
