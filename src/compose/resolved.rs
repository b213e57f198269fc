use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Which tree a resolved node came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Structure contributed by the layout.
    Layout,
    /// Content contributed by the page.
    Page,
}

/// A node of the composed tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedElement {
    /// Source element id.
    pub id: String,
    /// Component tag.
    pub tag: String,
    /// Component properties, copied from the source element.
    pub properties: Map<String, Value>,
    /// Source sibling order.
    pub order_index: i64,
    /// Source tree.
    pub origin: Origin,
    /// Ordered children.
    pub children: Vec<ResolvedElement>,
}

impl ResolvedElement {
    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Kind of slot validation finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotErrorKind {
    /// A required slot received no page content.
    RequiredSlotEmpty,
}

/// A validation finding reported next to a still-usable resolved tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValidationError {
    /// Offending slot.
    pub slot_name: String,
    /// Finding kind.
    pub error_type: SlotErrorKind,
    /// Human-readable description for editor warnings.
    pub message: String,
}

impl SlotValidationError {
    pub(crate) fn required_slot_empty(slot_name: &str) -> Self {
        Self {
            slot_name: slot_name.to_string(),
            error_type: SlotErrorKind::RequiredSlotEmpty,
            message: format!("Required slot \"{slot_name}\" is empty"),
        }
    }
}

/// Top-level page content that has nowhere to render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedContent {
    /// Root element id of the dropped subtree.
    pub element_id: String,
    /// Slot it was sent to; `None` when the layout has no slot to default to.
    pub slot_name: Option<String>,
}

/// Output of one composition run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResolution {
    /// Composed forest ready for rendering.
    pub resolved_tree: Vec<ResolvedElement>,
    /// Page subtrees grouped by destination slot name.
    pub slot_contents: BTreeMap<String, Vec<ResolvedElement>>,
    /// Required-slot findings, in slot traversal order.
    pub validation_errors: Vec<SlotValidationError>,
    /// Whether a layout took part in the composition.
    pub has_layout: bool,
    /// Page content dropped from `resolved_tree`, in page order.
    pub unplaced: Vec<UnplacedContent>,
}

impl LayoutResolution {
    /// `true` when no validation finding would block publishing.
    pub fn is_publishable(&self) -> bool {
        self.validation_errors.is_empty()
    }

    /// Number of nodes in the resolved forest.
    pub fn element_count(&self) -> usize {
        self.resolved_tree.iter().map(ResolvedElement::count).sum()
    }
}
