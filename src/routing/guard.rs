use crate::{
    config::opts::MAX_NESTING_DEPTH,
    foundation::{error::PagewrightError, ids::PageIdx},
    model::snapshot::Page,
    routing::ancestry::PageIndex,
};

/// Why a parent assignment was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParentRefusal {
    /// The candidate is the page itself or one of its descendants.
    #[error("page cannot be nested under itself or one of its descendants")]
    Circular,
    /// The move would exceed the nesting ceiling.
    #[error("nesting would reach {levels} levels (max {max})")]
    TooDeep {
        /// Levels from the root page down to the deepest page after the move.
        levels: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// The candidate parent is not in the page list.
    #[error("parent page '{0}' does not exist")]
    UnknownParent(String),
}

impl From<ParentRefusal> for PagewrightError {
    fn from(value: ParentRefusal) -> Self {
        PagewrightError::routing(value.to_string())
    }
}

/// Whether making `candidate_parent_id` the parent of `page_id` would close a cycle.
///
/// Self-parenting counts as circular. A chain that already loops is reported as
/// circular as well. `None` (un-nesting) never is.
pub fn has_circular_reference(
    page_id: &str,
    candidate_parent_id: Option<&str>,
    all_pages: &[Page],
) -> bool {
    let Some(candidate) = candidate_parent_id else {
        return false;
    };
    if candidate == page_id {
        return true;
    }
    let index = PageIndex::new(all_pages);
    let Some(start) = index.idx(candidate) else {
        return false;
    };
    circular_from(&index, page_id, start)
}

fn circular_from(index: &PageIndex<'_>, page_id: &str, start: PageIdx) -> bool {
    if index.page(start).id == page_id {
        return true;
    }
    let mut ancestors = index.ancestors(start);
    let hit = ancestors.by_ref().any(|idx| index.page(idx).id == page_id);
    hit || ancestors.cycled()
}

/// Number of ancestors of `page_id`, capped at [`MAX_NESTING_DEPTH`].
///
/// Root pages and pages missing from `all_pages` have depth 0.
pub fn nesting_depth(page_id: &str, all_pages: &[Page]) -> usize {
    nesting_depth_capped(page_id, all_pages, MAX_NESTING_DEPTH)
}

/// [`nesting_depth`] with a caller-chosen cap.
pub(crate) fn nesting_depth_capped(page_id: &str, all_pages: &[Page], cap: usize) -> usize {
    let index = PageIndex::new(all_pages);
    index
        .idx(page_id)
        .map_or(0, |idx| depth_of(&index, idx, cap))
}

fn depth_of(index: &PageIndex<'_>, idx: PageIdx, cap: usize) -> usize {
    index.ancestors(idx).take(cap).count()
}

/// Levels in the subtree rooted at `page_id` (1 for a leaf), capped at [`MAX_NESTING_DEPTH`].
pub fn subtree_height(page_id: &str, all_pages: &[Page]) -> usize {
    let index = PageIndex::new(all_pages);
    index.idx(page_id).map_or(0, |idx| {
        height_of(&index.children(), idx, MAX_NESTING_DEPTH)
    })
}

fn height_of(children: &[Vec<PageIdx>], root: PageIdx, cap: usize) -> usize {
    let mut seen = vec![false; children.len()];
    seen[root.0] = true;
    let mut level = vec![root];
    let mut height = 0;
    while !level.is_empty() && height < cap {
        height += 1;
        let mut next = Vec::new();
        for idx in level {
            for &child in &children[idx.0] {
                if !std::mem::replace(&mut seen[child.0], true) {
                    next.push(child);
                }
            }
        }
        level = next;
    }
    height
}

/// Decide whether `candidate_parent_id` may become the parent of `page_id`.
///
/// Levels after the move are the candidate's ancestors, the candidate itself, and the
/// moved page's own subtree; more than `max_depth` levels is refused. With the default
/// ceiling of 5 a page can hang below a chain of 4 but not below a chain of 5.
pub fn check_parent_assignment(
    page_id: &str,
    candidate_parent_id: Option<&str>,
    all_pages: &[Page],
    max_depth: usize,
) -> Result<(), ParentRefusal> {
    let index = PageIndex::new(all_pages);
    let children = index.children();
    check_with(&index, &children, page_id, candidate_parent_id, max_depth)
}

fn check_with(
    index: &PageIndex<'_>,
    children: &[Vec<PageIdx>],
    page_id: &str,
    candidate_parent_id: Option<&str>,
    max_depth: usize,
) -> Result<(), ParentRefusal> {
    let Some(candidate) = candidate_parent_id else {
        return Ok(());
    };
    if candidate == page_id {
        return Err(ParentRefusal::Circular);
    }
    let parent = index
        .idx(candidate)
        .ok_or_else(|| ParentRefusal::UnknownParent(candidate.to_string()))?;
    if circular_from(index, page_id, parent) {
        return Err(ParentRefusal::Circular);
    }

    let cap = max_depth.saturating_add(1);
    let own_height = index
        .idx(page_id)
        .map_or(1, |idx| height_of(children, idx, cap));
    let levels = depth_of(index, parent, cap) + 1 + own_height;
    if levels > max_depth {
        return Err(ParentRefusal::TooDeep {
            levels,
            max: max_depth,
        });
    }
    Ok(())
}

/// Pages that may be offered as the parent of `page_id`, in list order.
///
/// Excludes the page itself, its descendants, and candidates that would exceed
/// `max_depth`.
pub fn parent_candidates<'a>(
    page_id: &str,
    all_pages: &'a [Page],
    max_depth: usize,
) -> Vec<&'a Page> {
    let index = PageIndex::new(all_pages);
    let children = index.children();
    all_pages
        .iter()
        .filter(|p| check_with(&index, &children, page_id, Some(&p.id), max_depth).is_ok())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/routing/guard.rs"]
mod tests;
