//! Parsing of update records of the form `<command> <source> <destination> <time>`.

use std::{
    fmt::{self, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::core::{
    entities::{TemporalEdge, Timestamp, VertexId},
    EdgeOp,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseUpdateError {
    #[error("'{0}' is not a valid command, expected 'add' or 'delete'.")]
    InvalidCommand(String),
    #[error("The update record is missing the {0} field.")]
    MissingField(&'static str),
    #[error("The update record has unexpected trailing input '{0}'.")]
    TrailingInput(String),
    #[error("One of the tokens in the update record supposed to be an unsigned integer couldn't be parsed.")]
    ParseInt {
        #[from]
        source: ParseIntError,
    },
}

impl ParseUpdateError {
    /// Errors that only concern the command word, the numeric fields were well formed.
    pub fn is_unknown_command(&self) -> bool {
        matches!(self, ParseUpdateError::InvalidCommand(_))
    }
}

/// One timestamped edge operation as read from an update stream.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct EdgeUpdate {
    pub op: EdgeOp,
    pub edge: TemporalEdge,
}

impl EdgeUpdate {
    pub fn add(src: VertexId, dst: VertexId, time: Timestamp) -> Self {
        Self {
            op: EdgeOp::Add,
            edge: TemporalEdge::new(src, dst, time),
        }
    }

    pub fn delete(src: VertexId, dst: VertexId, time: Timestamp) -> Self {
        Self {
            op: EdgeOp::Delete,
            edge: TemporalEdge::new(src, dst, time),
        }
    }
}

impl Display for EdgeUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.op, self.edge.src, self.edge.dst, self.edge.time
        )
    }
}

impl FromStr for EdgeUpdate {
    type Err = ParseUpdateError;

    /// Parses a whitespace separated record. The numeric fields are checked before the command
    /// word so that a record with an unknown command but valid numbers can be told apart from
    /// a malformed one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let command = tokens.next().ok_or(ParseUpdateError::MissingField("command"))?;
        let src = tokens
            .next()
            .ok_or(ParseUpdateError::MissingField("source"))?
            .parse::<u64>()?;
        let dst = tokens
            .next()
            .ok_or(ParseUpdateError::MissingField("destination"))?
            .parse::<u64>()?;
        let time = tokens
            .next()
            .ok_or(ParseUpdateError::MissingField("time"))?
            .parse::<u64>()?;
        if let Some(extra) = tokens.next() {
            return Err(ParseUpdateError::TrailingInput(extra.to_owned()));
        }
        let op = command.parse::<EdgeOp>()?;
        Ok(Self {
            op,
            edge: TemporalEdge::new(src, dst, time),
        })
    }
}
