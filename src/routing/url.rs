use crate::{
    model::snapshot::{Layout, Page},
    routing::ancestry::PageIndex,
};

/// Compose the absolute URL of `page`.
///
/// 1. An absolute page slug (leading `/`) is returned unchanged.
/// 2. Otherwise relative slugs are collected up the parent chain until a root, a dangling
///    parent, or an ancestor with an absolute slug, which becomes the base.
/// 3. The layout slug, when present, is prepended as the leading segment.
/// 4. The result is normalized with [`normalize_url`].
///
/// Terminates on cyclic snapshots; the walk stops at the first revisited page.
#[tracing::instrument(skip_all, fields(page_id = %page.id))]
pub fn build_url(page: &Page, layout: Option<&Layout>, all_pages: &[Page]) -> String {
    if is_absolute(&page.slug) {
        return page.slug.clone();
    }

    let index = PageIndex::new(all_pages);
    let own = index.idx(&page.id);
    let chain: Vec<_> = page
        .parent_id
        .as_deref()
        .and_then(|id| index.idx(id))
        .into_iter()
        .flat_map(|first| std::iter::once(first).chain(index.ancestors(first)))
        .take_while(|&idx| Some(idx) != own)
        .collect();

    let mut segments = vec![page.slug.as_str()];
    let mut base = None;
    for idx in chain {
        let ancestor = index.page(idx);
        if is_absolute(&ancestor.slug) {
            base = Some(ancestor.slug.as_str());
            break;
        }
        segments.push(ancestor.slug.as_str());
    }

    segments.reverse();
    let mut url = segments.join("/");
    if let Some(base) = base {
        url = format!("{base}/{url}");
    }
    if let Some(prefix) = layout
        .and_then(|l| l.slug.as_deref())
        .filter(|s| !s.trim().is_empty())
    {
        url = format!("{prefix}/{url}");
    }
    normalize_url(&url)
}

/// Collapse repeated slashes, force exactly one leading slash and drop a trailing slash
/// unless the result is the bare root.
pub fn normalize_url(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// First page, in list order, whose composed URL equals `url`.
///
/// `exclude_page_id` skips the page being edited. Each page is composed with its own
/// layout looked up in `layouts`.
pub fn find_url_conflict<'a>(
    url: &str,
    all_pages: &'a [Page],
    layouts: &[Layout],
    exclude_page_id: Option<&str>,
) -> Option<&'a Page> {
    all_pages
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_page_id)
        .find(|p| {
            let layout = p
                .layout_id
                .as_deref()
                .and_then(|id| layouts.iter().find(|l| l.id == id));
            build_url(p, layout, all_pages) == url
        })
}

fn is_absolute(slug: &str) -> bool {
    slug.starts_with('/')
}

#[cfg(test)]
#[path = "../../tests/unit/routing/url.rs"]
mod tests;
