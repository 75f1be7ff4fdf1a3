// src/core/hierarchy.rs

//! Branch-mode lineage: works out which already-produced output every pipe
//! segment consumes and renders it as the `srcid` breadcrumb CTAP expects.

use crate::models::PipeSegment;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Pipe segment #{index} has an empty id.")]
    EmptyId { index: usize },
    #[error("Pipe segment id '{id}' is declared more than once.")]
    DuplicateId { id: String },
    #[error("Pipe segment '{id}' must name the segment it runs after (its parent).")]
    MissingParent { id: String },
    #[error("Pipe segment '{id}' lists itself as its parent.")]
    SelfReference { id: String },
    #[error("No such pipe: segment '{id}' refers to '{parent}', which is not declared before it.")]
    UnknownParent { id: String, parent: String },
}

/// The resolved position of one segment in the branch tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLineage {
    pub id: String,
    /// `"1"` followed by the segment's description label.
    pub own_label: String,
    /// Every ancestor id, root first, each followed by `#`.
    pub ancestor_chain: String,
    /// The text placed in `Cfg.srcid`. Empty for the first segment.
    pub srcid: String,
}

/// Resolves the lineage of every segment, in declaration order.
///
/// The first segment is the root; its `parent` is ignored. Every other segment
/// must name a segment declared before it.
pub fn resolve_hierarchy(segments: &[PipeSegment]) -> Result<Vec<SegmentLineage>, HierarchyError> {
    // id -> (own_label, ancestor_chain)
    let mut known: HashMap<&str, (String, String)> = HashMap::new();
    let mut lineages = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let id = segment.id.trim();
        if id.is_empty() {
            return Err(HierarchyError::EmptyId { index: index + 1 });
        }
        if known.contains_key(id) {
            return Err(HierarchyError::DuplicateId { id: id.to_string() });
        }

        let own_label = format!("1{}", segment.label);

        let (ancestor_chain, srcid) = if index == 0 {
            if let Some(parent) = segment.parent_id() {
                log::debug!("Ignoring parent '{}' of root segment '{}'.", parent, id);
            }
            (String::new(), String::new())
        } else {
            let parent = segment
                .parent_id()
                .ok_or_else(|| HierarchyError::MissingParent { id: id.to_string() })?;
            if parent == id {
                return Err(HierarchyError::SelfReference { id: id.to_string() });
            }
            let (parent_label, parent_chain) =
                known
                    .get(parent)
                    .ok_or_else(|| HierarchyError::UnknownParent {
                        id: id.to_string(),
                        parent: parent.to_string(),
                    })?;
            let chain = format!("{}{}#", parent_chain, parent);
            let srcid = format!("{}{}", chain, parent_label);
            (chain, srcid)
        };

        log::debug!("Segment '{}' resolved with srcid '{}'.", id, srcid);
        known.insert(id, (own_label.clone(), ancestor_chain.clone()));
        lineages.push(SegmentLineage {
            id: id.to_string(),
            own_label,
            ancestor_chain,
            srcid,
        });
    }

    Ok(lineages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, label: &str, parent: &str) -> PipeSegment {
        PipeSegment::new(id, label, parent, vec![])
    }

    #[test]
    fn test_root_segment_has_empty_srcid() {
        let lineages = resolve_hierarchy(&[segment("pipe1", "_load", "")]).unwrap();
        assert_eq!(lineages.len(), 1);
        assert_eq!(lineages[0].own_label, "1_load");
        assert_eq!(lineages[0].ancestor_chain, "");
        assert_eq!(lineages[0].srcid, "");
    }

    #[test]
    fn test_three_level_chain() {
        let segments = [
            segment("A", "_load", ""),
            segment("B", "_filter", "A"),
            segment("C", "_ica", "B"),
        ];
        let lineages = resolve_hierarchy(&segments).unwrap();

        assert_eq!(lineages[1].ancestor_chain, "A#");
        assert_eq!(lineages[1].srcid, "A#1_load");

        assert_eq!(lineages[2].ancestor_chain, "A#B#");
        assert_eq!(lineages[2].srcid, "A#B#1_filter");

        // B's own ancestry comes before C's direct reference to B.
        let srcid = &lineages[2].srcid;
        let b_chain_pos = srcid.find(&lineages[1].ancestor_chain).unwrap();
        let b_ref_pos = srcid.find("B#").unwrap();
        assert!(b_chain_pos < b_ref_pos);
        assert!(srcid.ends_with(&lineages[1].own_label));
    }

    #[test]
    fn test_siblings_share_a_parent() {
        let segments = [
            segment("base", "_load", ""),
            segment("left", "_a", "base"),
            segment("right", "_b", "base"),
        ];
        let lineages = resolve_hierarchy(&segments).unwrap();
        assert_eq!(lineages[1].srcid, "base#1_load");
        assert_eq!(lineages[2].srcid, "base#1_load");
    }

    #[test]
    fn test_root_parent_is_ignored() {
        let lineages = resolve_hierarchy(&[segment("pipe1", "_load", "ghost")]).unwrap();
        assert_eq!(lineages[0].srcid, "");
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let segments = [segment("pipe1", "_load", ""), segment("pipe2", "_x", "pipe9")];
        let err = resolve_hierarchy(&segments).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnknownParent {
                id: "pipe2".to_string(),
                parent: "pipe9".to_string()
            }
        );
        assert!(err.to_string().contains("No such pipe"));
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let segments = [
            segment("pipe1", "_load", ""),
            segment("pipe2", "_x", "pipe3"),
            segment("pipe3", "_y", "pipe1"),
        ];
        assert!(matches!(
            resolve_hierarchy(&segments),
            Err(HierarchyError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let segments = [segment("pipe1", "_load", ""), segment("pipe2", "_x", "pipe2")];
        assert_eq!(
            resolve_hierarchy(&segments).unwrap_err(),
            HierarchyError::SelfReference { id: "pipe2".to_string() }
        );
    }

    #[test]
    fn test_missing_parent_and_duplicates() {
        let missing = [segment("pipe1", "_load", ""), segment("pipe2", "_x", " ")];
        assert!(matches!(
            resolve_hierarchy(&missing),
            Err(HierarchyError::MissingParent { .. })
        ));

        let duplicated = [segment("pipe1", "_load", ""), segment("pipe1", "_x", "pipe1")];
        assert!(matches!(
            resolve_hierarchy(&duplicated),
            Err(HierarchyError::DuplicateId { .. })
        ));

        let unnamed = [segment(" ", "_load", "")];
        assert_eq!(
            resolve_hierarchy(&unnamed).unwrap_err(),
            HierarchyError::EmptyId { index: 1 }
        );
    }
}
