//! Reading update streams.
//!
//! An update stream is newline delimited text where every record has the form
//! `<command> <source> <destination> <time>`, `command` being `add` or `delete` and the other
//! fields unsigned integers separated by whitespace:
//!
//! ```text
//! add 1 2 2010
//! add 2 3 2010
//! delete 1 2 2010
//! ```
//!
//! Records are split by command into two [`EdgeBatch`]es. The first malformed record ends
//! the stream; everything before it is kept.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tempus_api::core::{input::EdgeUpdate, input::ParseUpdateError, EdgeOp};
use tracing::{debug, warn};

use crate::{db::api::mutation::batch::EdgeBatch, errors::GraphError};

/// The add and delete records of a stream, in stream order within each batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBatches {
    pub additions: EdgeBatch,
    pub deletions: EdgeBatch,
    /// Records skipped for an unknown command word
    pub skipped: usize,
    /// Line number (starting at 1) of the record that ended the stream early, if any
    pub stopped_at: Option<usize>,
}

impl Default for UpdateBatches {
    fn default() -> Self {
        Self {
            additions: EdgeBatch::new(EdgeOp::Add),
            deletions: EdgeBatch::new(EdgeOp::Delete),
            skipped: 0,
            stopped_at: None,
        }
    }
}

impl UpdateBatches {
    pub fn push(&mut self, update: EdgeUpdate) {
        let edge = update.edge;
        match update.op {
            EdgeOp::Add => self.additions.push(edge.src, edge.dst, edge.time),
            EdgeOp::Delete => self.deletions.push(edge.src, edge.dst, edge.time),
        }
    }

    /// Number of records kept
    pub fn len(&self) -> usize {
        self.additions.len() + self.deletions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.stopped_at.is_none()
    }
}

impl FromIterator<EdgeUpdate> for UpdateBatches {
    fn from_iter<I: IntoIterator<Item = EdgeUpdate>>(iter: I) -> Self {
        let mut batches = Self::default();
        for update in iter {
            batches.push(update);
        }
        batches
    }
}

/// Parse one line of an update stream. Blank lines yield `None`.
pub fn parse_update_line(line: &str) -> Result<Option<EdgeUpdate>, ParseUpdateError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// Read an update stream until it ends or a record fails to parse.
///
/// Records with an unknown command but well formed numbers are skipped and counted. A
/// malformed record or a read error stops the stream, the records read so far are returned.
pub fn read_updates<R: BufRead>(reader: R) -> UpdateBatches {
    let mut batches = UpdateBatches::default();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(line = line_no, error = %err, "failed to read update stream");
                batches.stopped_at = Some(line_no);
                break;
            }
        };
        match parse_update_line(&line) {
            Ok(Some(update)) => batches.push(update),
            Ok(None) => {}
            Err(err) if err.is_unknown_command() => {
                debug!(line = line_no, error = %err, "skipping update");
                batches.skipped += 1;
            }
            Err(err) => {
                warn!(line = line_no, error = %err, "stopping at malformed update");
                batches.stopped_at = Some(line_no);
                break;
            }
        }
    }
    debug!(
        additions = batches.additions.len(),
        deletions = batches.deletions.len(),
        skipped = batches.skipped,
        "read update stream"
    );
    batches
}

/// Like [`read_updates`] but any bad record, including an unknown command, is an error.
pub fn read_updates_strict<R: BufRead>(reader: R) -> Result<UpdateBatches, GraphError> {
    let mut batches = UpdateBatches::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let update = parse_update_line(&line)
            .map_err(|source| GraphError::InvalidUpdate { line: i + 1, source })?;
        if let Some(update) = update {
            batches.push(update);
        }
    }
    Ok(batches)
}

/// Open `path` and read it with [`read_updates`]
pub fn read_update_file(path: impl AsRef<Path>) -> Result<UpdateBatches, GraphError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GraphError::UpdateFileError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(read_updates(BufReader::new(file)))
}
