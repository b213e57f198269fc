use std::{fs::File, io::BufReader, path::Path};

use crate::{
    compose::{engine::resolve, resolved::LayoutResolution},
    config::opts::ResolveOpts,
    foundation::error::{PagewrightError, PagewrightResult},
    model::element::{Element, Scope},
    routing::{guard, url::build_url},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A routable page owning a tree of elements.
pub struct Page {
    /// Page identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Relative path segment, or an absolute path (leading `/`) overriding composition.
    pub slug: String,
    /// Parent page for nested routes.
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<String>,
    /// Layout the page is composed into.
    #[serde(default, alias = "layout_id")]
    pub layout_id: Option<String>,
    /// Order among sibling pages.
    #[serde(default, alias = "order_num")]
    pub order_index: i64,
    /// Owning project.
    #[serde(default, alias = "project_id")]
    pub project_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A reusable element tree with named slots.
pub struct Layout {
    /// Layout identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Path prefix applied to every page using this layout.
    #[serde(default)]
    pub slug: Option<String>,
    /// Owning project.
    #[serde(default, alias = "project_id")]
    pub project_id: String,
    /// Display-only description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Read-only editor state handed to the resolver.
///
/// A snapshot is plain data that can be built in code or deserialized from JSON
/// (see [`Snapshot::from_path`]). Resolution and URL composition borrow it and never
/// mutate it.
pub struct Snapshot {
    /// Page currently open in the editor.
    #[serde(default, alias = "current_page_id")]
    pub current_page_id: Option<String>,
    /// Every page of the project.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Every layout of the project.
    #[serde(default)]
    pub layouts: Vec<Layout>,
    /// Elements of all pages and layouts.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Resolution options.
    #[serde(default)]
    pub options: ResolveOpts,
}

/// One line of the project's route table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    /// Page id.
    pub page_id: String,
    /// Page title.
    pub title: String,
    /// Composed absolute URL.
    pub url: String,
    /// Number of ancestor pages.
    pub depth: usize,
}

impl Snapshot {
    /// Parse a snapshot from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PagewrightResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PagewrightError::serde(format!("parse snapshot JSON: {e}")))
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(s: &str) -> PagewrightResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PagewrightError::serde(format!("parse snapshot JSON: {e}")))
    }

    /// Parse a snapshot from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PagewrightResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PagewrightError::validation(format!("open snapshot JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check snapshot consistency, reporting every problem at once.
    ///
    /// Resolution tolerates all of these; validation is meant for boundaries such as
    /// the CLI or an import step.
    pub fn validate(&self) -> PagewrightResult<()> {
        self.options.validate()?;

        let mut errors = Vec::<String>::new();
        let mut seen = std::collections::HashSet::<&str>::new();
        for (i, page) in self.pages.iter().enumerate() {
            if !seen.insert(page.id.as_str()) {
                errors.push(format!("$.pages[{i}].id: duplicate page id '{}'", page.id));
            }
            if page.slug.trim().is_empty() {
                errors.push(format!("$.pages[{i}].slug: must be non-empty"));
            }
            if page.parent_id.as_deref() == Some(page.id.as_str()) {
                errors.push(format!("$.pages[{i}].parentId: page is its own parent"));
            }
        }

        seen.clear();
        for (i, layout) in self.layouts.iter().enumerate() {
            if !seen.insert(layout.id.as_str()) {
                errors.push(format!(
                    "$.layouts[{i}].id: duplicate layout id '{}'",
                    layout.id
                ));
            }
        }

        seen.clear();
        for (i, element) in self.elements.iter().enumerate() {
            if !seen.insert(element.id.as_str()) {
                errors.push(format!(
                    "$.elements[{i}].id: duplicate element id '{}'",
                    element.id
                ));
            }
            match element.scope() {
                None => errors.push(format!(
                    "$.elements[{i}]: exactly one of pageId/layoutId must be set"
                )),
                Some(Scope::Page(id)) if self.page(id).is_none() => {
                    errors.push(format!("$.elements[{i}].pageId: unknown page '{id}'"));
                }
                Some(Scope::Layout(id)) if self.layout(id).is_none() => {
                    errors.push(format!("$.elements[{i}].layoutId: unknown layout '{id}'"));
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PagewrightError::validation(errors.join("\n")))
        }
    }

    /// Page with `id`.
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Layout with `id`.
    pub fn layout(&self, id: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Layout `page` is bound to, if it exists.
    pub fn layout_for(&self, page: &Page) -> Option<&Layout> {
        page.layout_id.as_deref().and_then(|id| self.layout(id))
    }

    /// Elements belonging to `scope`, in list order.
    pub fn elements_in<'s>(&'s self, scope: Scope<'s>) -> impl Iterator<Item = &'s Element> {
        self.elements.iter().filter(move |e| e.in_scope(scope))
    }

    fn require_page(&self, page_id: &str) -> PagewrightResult<&Page> {
        self.page(page_id)
            .ok_or_else(|| PagewrightError::validation(format!("unknown page '{page_id}'")))
    }

    /// Compose the page `page_id` into its layout.
    #[tracing::instrument(skip(self))]
    pub fn resolve_page(&self, page_id: &str) -> PagewrightResult<LayoutResolution> {
        let page = self.require_page(page_id)?;
        Ok(resolve(
            self.layout_for(page),
            page,
            &self.elements,
            &self.options,
        ))
    }

    /// Compose the current page; `None` when no page is open.
    pub fn resolve_current(&self) -> PagewrightResult<Option<LayoutResolution>> {
        self.current_page_id
            .as_deref()
            .map(|id| self.resolve_page(id))
            .transpose()
    }

    /// Absolute URL of the page `page_id`.
    pub fn page_url(&self, page_id: &str) -> PagewrightResult<String> {
        let page = self.require_page(page_id)?;
        Ok(build_url(page, self.layout_for(page), &self.pages))
    }

    /// URL of every page, in page list order.
    ///
    /// `depth` is capped at `options.max_nesting_depth`.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.pages
            .iter()
            .map(|page| RouteEntry {
                page_id: page.id.clone(),
                title: page.title.clone(),
                url: build_url(page, self.layout_for(page), &self.pages),
                depth: guard::nesting_depth_capped(
                    &page.id,
                    &self.pages,
                    self.options.max_nesting_depth,
                ),
            })
            .collect()
    }

    /// Refuse a parent assignment that would be circular or too deep.
    pub fn check_parent(
        &self,
        page_id: &str,
        candidate_parent_id: Option<&str>,
    ) -> PagewrightResult<()> {
        self.page(page_id)
            .ok_or_else(|| PagewrightError::routing(format!("unknown page '{page_id}'")))?;
        guard::check_parent_assignment(
            page_id,
            candidate_parent_id,
            &self.pages,
            self.options.max_nesting_depth,
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/snapshot.rs"]
mod tests;
