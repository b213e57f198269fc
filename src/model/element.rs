use serde_json::{Map, Value};

use crate::config::opts::ResolveOpts;

/// Legacy slot assignment key, read when the configured key is absent.
const LEGACY_TARGET_SLOT_KEY: &str = "slot_name";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A node of either a page tree or a layout tree, as handed over by the editor.
///
/// Exactly one of [`Element::page_id`] / [`Element::layout_id`] is expected to be set;
/// see [`Element::scope`].
pub struct Element {
    /// Element identifier (unique across the snapshot).
    pub id: String,
    /// Parent element in the same scope; `None` for roots.
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<String>,
    /// Sibling order, ascending.
    #[serde(default, alias = "order_num")]
    pub order_index: i64,
    /// Component tag; the configured slot tag marks insertion points.
    pub tag: String,
    /// Open property bag.
    #[serde(default, alias = "props")]
    pub properties: Map<String, Value>,
    /// Owning page, for page-scoped elements.
    #[serde(default, alias = "page_id", skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    /// Owning layout, for layout-scoped elements.
    #[serde(default, alias = "layout_id", skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<String>,
}

/// The tree an element belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope<'a> {
    /// Element of the page with this id.
    Page(&'a str),
    /// Element of the layout with this id.
    Layout(&'a str),
}

impl Element {
    /// Scope of this element, or `None` when neither or both scoping fields are set.
    pub fn scope(&self) -> Option<Scope<'_>> {
        match (self.page_id.as_deref(), self.layout_id.as_deref()) {
            (Some(p), None) => Some(Scope::Page(p)),
            (None, Some(l)) => Some(Scope::Layout(l)),
            _ => None,
        }
    }

    /// Whether this element belongs to `scope`.
    pub fn in_scope(&self, scope: Scope<'_>) -> bool {
        self.scope() == Some(scope)
    }

    /// Slot name requested by a top-level page element, if any.
    ///
    /// Empty or non-string values count as absent.
    pub fn target_slot(&self, opts: &ResolveOpts) -> Option<&str> {
        self.string_prop(&opts.target_slot_key)
            .or_else(|| self.string_prop(LEGACY_TARGET_SLOT_KEY))
    }

    fn string_prop(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Declared contract of a slot marker.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlotSpec {
    /// Slot name, unique within its layout after collision handling.
    pub name: String,
    /// Whether the slot must receive page content.
    pub required: bool,
    /// Display-only description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SlotSpec {
    fn from_element(element: &Element) -> Self {
        let name = element
            .string_prop("name")
            .map(str::to_string)
            .unwrap_or_else(|| synthetic_slot_name(&element.id));
        let required = element
            .properties
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let description = element
            .properties
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            name,
            required,
            description,
        }
    }
}

/// Name given to a slot marker without an explicit `name` property.
pub fn synthetic_slot_name(element_id: &str) -> String {
    format!("slot-{element_id}")
}

/// Element classification decided once at ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind<'a> {
    /// Ordinary component carried through unchanged.
    Regular {
        /// Component tag.
        tag: &'a str,
        /// Component properties.
        properties: &'a Map<String, Value>,
    },
    /// Insertion point replaced by page content during composition.
    SlotMarker(SlotSpec),
}

impl<'a> ElementKind<'a> {
    /// Classify `element` against the configured slot tag.
    pub fn classify(element: &'a Element, opts: &ResolveOpts) -> Self {
        if element.tag == opts.slot_tag {
            Self::SlotMarker(SlotSpec::from_element(element))
        } else {
            Self::Regular {
                tag: &element.tag,
                properties: &element.properties,
            }
        }
    }

    /// Slot contract when this is a marker.
    pub fn as_slot(&self) -> Option<&SlotSpec> {
        match self {
            Self::SlotMarker(spec) => Some(spec),
            Self::Regular { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/element.rs"]
mod tests;
