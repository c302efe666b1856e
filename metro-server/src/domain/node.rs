//! Station-line node identifiers.

use std::fmt;

/// Error returned when parsing an invalid node identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node id: {reason}")]
pub struct InvalidNodeId {
    reason: &'static str,
}

/// Identifier of a station as served by one specific line.
///
/// The canonical form is a station name followed by a parenthesized line
/// designator, e.g. `서울역(1)` or `Gimpo Airport(A)`. The same physical
/// station served by two lines appears as two distinct nodes, one per line.
/// Designators are opaque tokens; identifiers without a designator are
/// accepted and belong to no particular line.
///
/// Ordering is byte-wise lexicographic over the full identifier. The routing
/// engine relies on this ordering to break cost ties deterministically, so it
/// is part of the type's contract, not an incidental derive.
///
/// # Examples
///
/// ```
/// use metro_server::domain::NodeId;
///
/// let node = NodeId::parse("홍대입구(2)").unwrap();
/// assert_eq!(node.station_name(), "홍대입구");
/// assert_eq!(node.line(), Some("2"));
///
/// // Empty identifiers are rejected
/// assert!(NodeId::parse("").is_err());
///
/// // An opening paren needs a closing one
/// assert!(NodeId::parse("홍대입구(2").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Parse a node identifier from a string.
    ///
    /// The input must be non-empty, without surrounding whitespace. If it
    /// contains a `(`, the last paren group is taken as the line designator
    /// and both the station name and the designator must be non-empty.
    pub fn parse(s: &str) -> Result<Self, InvalidNodeId> {
        if s.is_empty() {
            return Err(InvalidNodeId {
                reason: "must not be empty",
            });
        }

        if s.trim() != s {
            return Err(InvalidNodeId {
                reason: "must not have surrounding whitespace",
            });
        }

        if let Some(open) = s.rfind('(') {
            if !s.ends_with(')') {
                return Err(InvalidNodeId {
                    reason: "line designator must be closed with ')'",
                });
            }
            if open == 0 {
                return Err(InvalidNodeId {
                    reason: "station name must not be empty",
                });
            }
            if open + 1 == s.len() - 1 {
                return Err(InvalidNodeId {
                    reason: "line designator must not be empty",
                });
            }
        }

        Ok(NodeId(s.to_string()))
    }

    /// Returns the full identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the station name without the line designator.
    pub fn station_name(&self) -> &str {
        match self.0.rfind('(') {
            Some(open) => &self.0[..open],
            None => &self.0,
        }
    }

    /// Returns the line designator, if the identifier carries one.
    pub fn line(&self) -> Option<&str> {
        let open = self.0.rfind('(')?;
        Some(&self.0[open + 1..self.0.len() - 1])
    }

    /// True if both nodes name the same physical station on different lines.
    ///
    /// This is the condition under which the ETL collaborator synthesizes a
    /// transfer edge between them.
    pub fn is_transfer_pair(&self, other: &NodeId) -> bool {
        self.station_name() == other.station_name() && self.line() != other.line()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
