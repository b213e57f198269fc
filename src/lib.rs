//! pagewright composes page element trees into reusable layouts and derives page URLs.
//!
//! A visual page builder keeps pages, layouts and their elements as flat records. This
//! crate turns a read-only [`Snapshot`] of that state into:
//!
//! 1. **Trees**: flat parent-pointer lists become ordered forests ([`ElementTree`]).
//! 2. **Slots**: a layout's `Slot` markers become an ordered contract ([`SlotIndex`]).
//! 3. **Assignment**: top-level page subtrees are routed to slots ([`SlotAssignment`]).
//! 4. **Composition**: the layout tree with page content spliced in, plus a validation
//!    report ([`resolve`] -> [`LayoutResolution`]).
//! 5. **Routing**: a page's absolute URL from its ancestor chain and layout prefix
//!    ([`build_url`]), with the cycle/depth guards an editor runs before committing a
//!    parent change ([`check_parent_assignment`]).
//!
//! Design constraints:
//!
//! - **Pure**: no IO outside the snapshot loaders; inputs are borrowed, never mutated.
//! - **Deterministic**: output order never depends on hash-map iteration, so two runs over
//!   the same snapshot serialize byte-identically.
//! - **Forgiving**: structural anomalies (orphans, duplicate slot names, content without a
//!   slot) degrade to documented fallbacks instead of errors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod config;
mod foundation;
mod model;
mod routing;
mod slot;
mod tree;

pub use compose::engine::resolve;
pub use compose::resolved::{
    LayoutResolution, Origin, ResolvedElement, SlotErrorKind, SlotValidationError,
    UnplacedContent,
};
pub use config::opts::{
    DefaultSlotPolicy, MAX_NESTING_DEPTH, ResolveOpts, SLOT_TAG, TARGET_SLOT_KEY,
};
pub use foundation::error::{PagewrightError, PagewrightResult};
pub use foundation::ids::ElementIdx;
pub use model::element::{Element, ElementKind, Scope, SlotSpec, synthetic_slot_name};
pub use model::snapshot::{Layout, Page, RouteEntry, Snapshot};
pub use routing::guard::{
    ParentRefusal, check_parent_assignment, has_circular_reference, nesting_depth,
    parent_candidates, subtree_height,
};
pub use routing::params::{
    extract_dynamic_params, fill_dynamic_params, has_dynamic_params, match_dynamic_url,
};
pub use routing::url::{build_url, find_url_conflict, normalize_url};
pub use slot::assign::SlotAssignment;
pub use slot::index::{SlotDescriptor, SlotIndex, SlotPosition};
pub use tree::builder::{ElementTree, TreeNode};
