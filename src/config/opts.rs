use crate::foundation::error::{PagewrightError, PagewrightResult};

/// Reserved element tag marking a slot insertion point.
pub const SLOT_TAG: &str = "Slot";

/// Page element property naming the slot a top-level subtree should fill.
pub const TARGET_SLOT_KEY: &str = "targetSlot";

/// Hard ceiling on page nesting (levels from a root page down to a leaf).
pub const MAX_NESTING_DEPTH: usize = 5;

/// How untagged top-level page content picks its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultSlotPolicy {
    /// First required slot without tagged content, else first required slot, else first slot.
    #[default]
    FirstUnfilledRequired,
    /// First required slot, else first slot, regardless of tagged content.
    FirstRequired,
}

/// Options controlling slot detection, default-slot selection and nesting limits.
///
/// Deserializable so a snapshot can carry its own `options` object; every field
/// falls back to its default when absent.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveOpts {
    /// Tag that marks an element as a slot.
    pub slot_tag: String,
    /// Property key carrying a page subtree's target slot name.
    pub target_slot_key: String,
    /// Default-slot selection rule for untagged content.
    pub default_slot: DefaultSlotPolicy,
    /// Maximum page nesting levels accepted by the parent-assignment guard.
    pub max_nesting_depth: usize,
}

impl Default for ResolveOpts {
    fn default() -> Self {
        Self {
            slot_tag: SLOT_TAG.to_string(),
            target_slot_key: TARGET_SLOT_KEY.to_string(),
            default_slot: DefaultSlotPolicy::default(),
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl ResolveOpts {
    /// Validate option invariants.
    pub fn validate(&self) -> PagewrightResult<()> {
        if self.slot_tag.trim().is_empty() {
            return Err(PagewrightError::validation("options.slotTag must be non-empty"));
        }
        if self.target_slot_key.trim().is_empty() {
            return Err(PagewrightError::validation(
                "options.targetSlotKey must be non-empty",
            ));
        }
        if self.max_nesting_depth == 0 {
            return Err(PagewrightError::validation(
                "options.maxNestingDepth must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/opts.rs"]
mod tests;
