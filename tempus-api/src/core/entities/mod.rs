use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Opaque vertex identifier. Vertices have no record of their own, they exist wherever an
/// edge mentions them.
pub type VertexId = u64;

/// Event time of an edge. Windows over time are half-open: `start..end`.
pub type Timestamp = u64;

/// A single undirected edge observed at `time`.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct TemporalEdge {
    pub src: VertexId,
    pub dst: VertexId,
    pub time: Timestamp,
}

impl TemporalEdge {
    pub fn new(src: VertexId, dst: VertexId, time: Timestamp) -> Self {
        Self { src, dst, time }
    }

    /// The same edge seen from the other endpoint
    pub fn reversed(&self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
            time: self.time,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }

    pub fn in_window(&self, w: &Range<Timestamp>) -> bool {
        w.contains(&self.time)
    }
}

impl From<(VertexId, VertexId, Timestamp)> for TemporalEdge {
    fn from((src, dst, time): (VertexId, VertexId, Timestamp)) -> Self {
        Self::new(src, dst, time)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn window_is_half_open() {
        let e = TemporalEdge::new(1, 2, 10);
        assert!(e.in_window(&(10..11)));
        assert!(!e.in_window(&(0..10)));
        assert!(!e.in_window(&(11..20)));
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 12..10;
        assert!(!e.in_window(&empty));
    }

    #[test]
    fn reversed_keeps_time() {
        let e = TemporalEdge::from((3, 4, 7));
        assert_eq!(e.reversed(), TemporalEdge::new(4, 3, 7));
        assert!(!e.is_self_loop());
        assert!(TemporalEdge::new(5, 5, 0).is_self_loop());
    }
}
