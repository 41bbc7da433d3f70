//! Tree reconstruction from indentation depth
//!
//! The input never names a node's parent; nesting is implied by depth alone.
//! [`TreeReconstructor`] keeps one open ancestor per depth: `open[d]` is the
//! most recent node seen at depth `d`. A new node at depth `d` closes every
//! open ancestor at depth `>= d`, takes `open[d - 1]` (or the title, at depth
//! 0) as its parent and becomes the open node at depth `d`.

use tracing::{debug, span, trace, Level};

use super::record::LineRecord;
use crate::core::{DiagramError, NodeId};

/// A reconstructed parent/child pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    pub parent: NodeId,
    pub child: NodeId,
}

/// Incremental depth-stack reconstructor
#[derive(Debug, Default)]
pub struct TreeReconstructor {
    open: Vec<NodeId>,
}

impl TreeReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest depth a new node may have right now
    pub fn max_depth(&self) -> usize {
        self.open.len()
    }

    /// Place `child` at `depth` and return its parent
    ///
    /// `line` is only used for error reporting.
    pub fn push(&mut self, depth: usize, child: NodeId, line: usize) -> Result<NodeId, DiagramError> {
        if depth > self.open.len() {
            return Err(DiagramError::depth_jump(line, depth, self.open.len()));
        }

        self.open.truncate(depth);
        let parent = match depth {
            0 => NodeId::TITLE,
            _ => self.open[depth - 1],
        };
        self.open.push(child);

        trace!(depth, %child, %parent, "Placed node");
        Ok(parent)
    }
}

/// Reconstruct the parent of every record
///
/// Record `i` (0-based) gets node id `Real(i + 1)`. Links come back in record
/// order, one per record.
pub fn reconstruct(records: &[LineRecord]) -> Result<Vec<ParentLink>, DiagramError> {
    let tree_span = span!(Level::DEBUG, "reconstruct_tree", record_count = records.len());
    let _enter = tree_span.enter();

    let mut reconstructor = TreeReconstructor::new();
    let links = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let child = NodeId::Real(index + 1);
            reconstructor
                .push(record.depth, child, record.line)
                .map(|parent| ParentLink { parent, child })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(link_count = links.len(), "Tree reconstructed");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::structure::record::extract_records;

    fn parents(input: &str) -> Vec<(usize, usize)> {
        let records = extract_records(input.lines()).unwrap();
        reconstruct(&records)
            .unwrap()
            .into_iter()
            .map(|link| (link.parent.ordinal(), link.child.ordinal()))
            .collect()
    }

    #[test]
    fn test_children_of_one_parent() {
        assert_eq!(
            parents("Group\n Geode\n Geode\n"),
            vec![(0, 1), (1, 2), (1, 3)]
        );
    }

    #[test]
    fn test_depth_zero_siblings_hang_off_title() {
        assert_eq!(parents("Group\nGroup\n"), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_return_to_shallower_depth() {
        let input = "Group\n LOD\n  Geode\n Switch\n  Geode\nGroup\n";
        assert_eq!(
            parents(input),
            vec![(0, 1), (1, 2), (2, 3), (1, 4), (4, 5), (0, 6)]
        );
    }

    #[test]
    fn test_multi_level_dedent_keeps_later_siblings() {
        let input = "Group\n Group\n  Group\n   Geode\n Geode\n Geode\n";
        assert_eq!(
            parents(input),
            vec![(0, 1), (1, 2), (2, 3), (3, 4), (1, 5), (1, 6)]
        );
    }

    #[test]
    fn test_depth_jump_rejected() {
        let records = extract_records("Group\n   Geode\n".lines()).unwrap();
        let err = reconstruct(&records).unwrap_err();
        assert!(matches!(
            err,
            DiagramError::DepthJump { line: 2, depth: 3, max_depth: 1 }
        ));
    }

    #[test]
    fn test_first_record_must_be_at_depth_zero() {
        let records = extract_records(" Group\n".lines()).unwrap();
        let err = reconstruct(&records).unwrap_err();
        assert!(matches!(
            err,
            DiagramError::DepthJump { line: 1, depth: 1, max_depth: 0 }
        ));
        assert!(err.to_string().contains("depth 1 is deeper than the deepest allowed depth (0)"));
    }

    #[test]
    fn test_push_reports_max_depth() {
        let mut reconstructor = TreeReconstructor::new();
        assert_eq!(reconstructor.max_depth(), 0);
        reconstructor.push(0, NodeId::Real(1), 1).unwrap();
        reconstructor.push(1, NodeId::Real(2), 2).unwrap();
        assert_eq!(reconstructor.max_depth(), 2);
        assert_eq!(reconstructor.push(0, NodeId::Real(3), 3).unwrap(), NodeId::TITLE);
        assert_eq!(reconstructor.max_depth(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(parents("").is_empty());
    }
}
