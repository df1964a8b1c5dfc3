//! Materialized path codec
//!
//! Encodes a position in the hierarchy as a prefix-comparable string: one
//! delimiter before every segment, so `["0", "2"]` becomes `/0/2`. Prefix
//! comparison is boundary-aware — `/1` is never an ancestor of `/10` — and the
//! empty string is the conventional root path, an ancestor of every path.

use super::errors::{HierarchyError, HierarchyResult};

/// Reserved path delimiter; segments must not contain it
pub const DELIMITER: char = '/';

/// Encodes and compares materialized paths
pub struct PathCodec;

impl PathCodec {
    /// Joins ancestor segments into a path (`["0", "2"]` → `/0/2`)
    pub fn encode<S: AsRef<str>>(segments: &[S]) -> HierarchyResult<String> {
        let mut path = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            if segment.is_empty() || segment.contains(DELIMITER) {
                return Err(HierarchyError::InvalidSegment(segment.to_string()));
            }
            path.push(DELIMITER);
            path.push_str(segment);
        }
        Ok(path)
    }

    /// Splits a path back into segments; the root path yields none
    pub fn split(path: &str) -> Vec<&str> {
        path.split(DELIMITER).filter(|s| !s.is_empty()).collect()
    }

    /// Appends one segment to a parent path
    pub fn child_path(parent: &str, segment: &str) -> HierarchyResult<String> {
        if segment.is_empty() || segment.contains(DELIMITER) {
            return Err(HierarchyError::InvalidSegment(segment.to_string()));
        }
        Ok(format!("{}{}{}", parent, DELIMITER, segment))
    }

    /// Last segment of a path, `None` for the root path
    pub fn leaf_segment(path: &str) -> Option<&str> {
        Self::split(path).last().copied()
    }

    /// Rewrites `path` from under `old_prefix` to under `new_prefix`.
    ///
    /// Returns `None` when `path` is not a descendant of `old_prefix`; the
    /// move cascade treats that as "not part of the moved subtree".
    pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
        if !Self::is_descendant_path(path, old_prefix) {
            return None;
        }
        Some(format!("{}{}", new_prefix, &path[old_prefix.len()..]))
    }

    /// True iff `candidate` is `ancestor` itself or lies underneath it.
    ///
    /// Boundary-aware: the remainder after the ancestor prefix must begin with
    /// the delimiter, so `/1` does not match candidate `/10`.
    pub fn is_descendant_path(candidate: &str, ancestor: &str) -> bool {
        // "/" alone is the root path spelled with an explicit delimiter
        let ancestor = if ancestor.len() == 1 && ancestor.starts_with(DELIMITER) {
            ""
        } else {
            ancestor
        };
        if candidate == ancestor {
            return true;
        }
        match candidate.strip_prefix(ancestor) {
            Some(rest) => rest.starts_with(DELIMITER),
            None => false,
        }
    }

    /// Like [`is_descendant_path`](Self::is_descendant_path), excluding the
    /// ancestor itself
    pub fn is_strict_descendant_path(candidate: &str, ancestor: &str) -> bool {
        candidate != ancestor && Self::is_descendant_path(candidate, ancestor)
    }
}
