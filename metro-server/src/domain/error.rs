//! Domain error types.
//!
//! Graph construction errors abort loading entirely; query errors are
//! returned per request. Expected no-result outcomes (an unreachable
//! destination, no common meeting station) are not errors and live on the
//! outcome types instead.

use super::NodeId;

/// Error raised while assembling the rail graph.
///
/// Any occurrence aborts the whole load; a partially constructed graph is
/// never handed out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid edge {a} - {b}: {reason}")]
pub struct InvalidEdge {
    /// One endpoint of the offending edge.
    pub a: NodeId,
    /// The other endpoint.
    pub b: NodeId,
    /// Why the edge was rejected.
    pub reason: String,
}

impl InvalidEdge {
    pub fn new(a: NodeId, b: NodeId, reason: impl Into<String>) -> Self {
        Self {
            a,
            b,
            reason: reason.into(),
        }
    }
}

/// Error raised by a shortest-path or meeting-point query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The query referenced a node absent from the graph.
    #[error("unknown station node: {0}")]
    UnknownNode(NodeId),

    /// The predecessor chain broke while walking back from the destination.
    ///
    /// A correctly built cost table always chains back to its source, so this
    /// indicates a bug in the engine. It is never an expected outcome and
    /// must be reported loudly rather than degraded into a truncated path.
    #[error("shortest-path predecessor chain broken at {node}; cost table is corrupt")]
    BrokenPredecessorChain {
        /// The node whose predecessor link was missing or cyclic.
        node: NodeId,
    },
}
