use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::core::input::ParseUpdateError;

pub mod entities;
pub mod input;
pub mod storage;
pub mod utils;

/// Denotes what a batch of edge updates does to the graph.
#[derive(Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub enum EdgeOp {
    #[default]
    Add,
    Delete,
}

impl EdgeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeOp::Add => "add",
            EdgeOp::Delete => "delete",
        }
    }
}

impl Display for EdgeOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EdgeOp {
    type Err = ParseUpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(EdgeOp::Add),
            "delete" => Ok(EdgeOp::Delete),
            other => Err(ParseUpdateError::InvalidCommand(other.to_owned())),
        }
    }
}
