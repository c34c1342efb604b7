//! Search page controller: query parameters, dispatch, and the result view.

use tracing::{debug, info};

use crate::blobref::BlobRef;
use crate::client::{PermanodeStore, SearchResult, StoreError};

/// What kind of search the `t` query parameter asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    /// No `t` parameter: match the value against any attribute.
    Any,
    Tag,
    Title,
    /// Unrecognized kind, preserved verbatim. Dispatches no search; the
    /// original UI silently did nothing for these and we keep that
    /// behavior explicit rather than guessing a correction.
    Other(String),
}

impl SearchKind {
    pub fn parse(t: &str) -> Self {
        match t {
            "" => SearchKind::Any,
            "tag" => SearchKind::Tag,
            "title" => SearchKind::Title,
            other => SearchKind::Other(other.to_string()),
        }
    }

    /// Value for the `t` parameter in outbound search URLs, if any.
    pub fn as_param(&self) -> Option<&str> {
        match self {
            SearchKind::Any => None,
            SearchKind::Tag => Some("tag"),
            SearchKind::Title => Some("title"),
            SearchKind::Other(s) => Some(s),
        }
    }
}

/// Resolved search request, built fresh from the page URL on every request.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub kind: SearchKind,
    /// Fuzzy flag, passed through to the index as given.
    pub fuzzy: String,
}

impl SearchParams {
    /// Parse the recognized parameters (`q`, `t`, `f`) out of a raw query
    /// string. Absent parameters default to the empty string.
    pub fn from_query(query: &str) -> Self {
        let mut q = String::new();
        let mut t = String::new();
        let mut f = String::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => q = value.into_owned(),
                "t" => t = value.into_owned(),
                "f" => f = value.into_owned(),
                _ => {}
            }
        }
        Self {
            query: q,
            kind: SearchKind::parse(&t),
            fuzzy: f,
        }
    }

    /// Banner text shown above a non-empty result listing.
    pub fn banner(&self) -> Option<String> {
        match self.kind {
            SearchKind::Tag => Some(format!("Tagged with \"{}\"", self.query)),
            SearchKind::Title => Some(format!("Titled with \"{}\"", self.query)),
            SearchKind::Any => Some(format!("General search for \"{}\"", self.query)),
            SearchKind::Other(_) => None,
        }
    }
}

/// Run a search against the store: discover the signing key, then do one
/// attribute search keyed by the search kind.
///
/// Returns `Ok(None)` when there is nothing to dispatch: an empty query
/// or an unrecognized kind.
pub async fn run_search(
    store: &dyn PermanodeStore,
    params: &SearchParams,
) -> Result<Option<SearchResult>, StoreError> {
    if params.query.is_empty() {
        return Ok(None);
    }

    // Tag searches honor the caller's fuzzy flag; title and any-attribute
    // searches are always exact over the indexed value.
    let (attr, fuzzy) = match &params.kind {
        SearchKind::Tag => ("tag", params.fuzzy.as_str()),
        SearchKind::Title => ("title", "true"),
        SearchKind::Any => ("", "true"),
        SearchKind::Other(kind) => {
            debug!(kind, "unrecognized search kind, not dispatching");
            return Ok(None);
        }
    };

    let sig = store.sig_discovery().await?;
    let result = store
        .permanodes_with_attr(&sig.public_key_blob_ref, attr, &params.query, fuzzy)
        .await?;
    info!(
        query = %params.query,
        attr,
        hits = result.with_attr.len(),
        "search complete"
    );
    Ok(Some(result))
}

/// One rendered result row: a selectable permanode with its display title.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub permanode: BlobRef,
    pub title: String,
    pub checked: bool,
}

impl ResultRow {
    /// Link target for the permanode's detail view.
    pub fn detail_href(&self) -> String {
        format!("./?p={}", self.permanode)
    }
}

/// View model for the results container. The container is rebuilt from
/// scratch on every render: when `rows` is empty all result UI (banner,
/// collection controls) is hidden.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    pub banner: Option<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultsView {
    /// The no-results view: everything hidden.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the view for a completed search, one row per hit in response
    /// order.
    pub fn build(params: &SearchParams, result: &SearchResult) -> Self {
        let rows: Vec<ResultRow> = result
            .with_attr
            .iter()
            .map(|hit| ResultRow {
                title: result.title_of(&hit.permanode),
                permanode: hit.permanode.clone(),
                checked: false,
            })
            .collect();

        let banner = if rows.is_empty() {
            None
        } else {
            params.banner()
        };

        Self { banner, rows }
    }

    /// Whether the collection controls (and the select-all box) are shown.
    pub fn controls_visible(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Mirror the master checkbox onto every row.
    pub fn set_all_checked(&mut self, checked: bool) {
        for row in &mut self.rows {
            row.checked = checked;
        }
    }

    /// Refs of the checked rows, in row order.
    pub fn ticked(&self) -> Vec<BlobRef> {
        self.rows
            .iter()
            .filter(|r| r.checked)
            .map(|r| r.permanode.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AttrHit;

    fn result_of(refs: &[&str]) -> SearchResult {
        SearchResult {
            with_attr: refs
                .iter()
                .map(|r| AttrHit {
                    permanode: BlobRef::parse(r).unwrap(),
                })
                .collect(),
            meta: Default::default(),
        }
    }

    #[test]
    fn parses_all_recognized_params() {
        let p = SearchParams::from_query("q=beach&t=tag&f=true");
        assert_eq!(p.query, "beach");
        assert_eq!(p.kind, SearchKind::Tag);
        assert_eq!(p.fuzzy, "true");
    }

    #[test]
    fn absent_params_default_to_empty() {
        let p = SearchParams::from_query("q=beach");
        assert_eq!(p.query, "beach");
        assert_eq!(p.kind, SearchKind::Any);
        assert_eq!(p.fuzzy, "");

        let p = SearchParams::from_query("");
        assert_eq!(p.query, "");
        assert_eq!(p.kind, SearchKind::Any);
        assert_eq!(p.fuzzy, "");
    }

    #[test]
    fn query_values_are_percent_decoded() {
        let p = SearchParams::from_query("q=summer%20trip&t=title");
        assert_eq!(p.query, "summer trip");
        assert_eq!(p.kind, SearchKind::Title);
    }

    #[test]
    fn unrecognized_kind_is_preserved() {
        let p = SearchParams::from_query("q=x&t=filename");
        assert_eq!(p.kind, SearchKind::Other("filename".to_string()));
        assert!(p.banner().is_none());
    }

    #[test]
    fn banner_text_by_kind() {
        let tag = SearchParams::from_query("q=beach&t=tag");
        assert_eq!(tag.banner().unwrap(), "Tagged with \"beach\"");
        let title = SearchParams::from_query("q=beach&t=title");
        assert_eq!(title.banner().unwrap(), "Titled with \"beach\"");
        let any = SearchParams::from_query("q=beach");
        assert_eq!(any.banner().unwrap(), "General search for \"beach\"");
    }

    #[test]
    fn view_has_one_row_per_hit_in_order() {
        let params = SearchParams::from_query("q=beach&t=tag");
        let result = result_of(&["sha1-aaa111", "sha1-bbb222", "sha1-ccc333"]);
        let view = ResultsView::build(&params, &result);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0].permanode.as_str(), "sha1-aaa111");
        assert_eq!(view.rows[2].permanode.as_str(), "sha1-ccc333");
        assert!(view.controls_visible());
        assert_eq!(view.banner.as_deref(), Some("Tagged with \"beach\""));
    }

    #[test]
    fn empty_result_hides_everything() {
        let params = SearchParams::from_query("q=beach&t=tag");
        let view = ResultsView::build(&params, &result_of(&[]));
        assert!(view.rows.is_empty());
        assert!(view.banner.is_none());
        assert!(!view.controls_visible());
    }

    #[test]
    fn check_all_then_ticked_returns_all_in_order() {
        let params = SearchParams::from_query("q=beach");
        let result = result_of(&["sha1-aaa111", "sha1-bbb222"]);
        let mut view = ResultsView::build(&params, &result);

        view.set_all_checked(true);
        let ticked = view.ticked();
        assert_eq!(ticked.len(), 2);
        assert_eq!(ticked[0].as_str(), "sha1-aaa111");
        assert_eq!(ticked[1].as_str(), "sha1-bbb222");

        view.set_all_checked(false);
        assert!(view.ticked().is_empty());
    }

    #[test]
    fn row_links_point_at_detail_view() {
        let row = ResultRow {
            permanode: BlobRef::parse("sha1-abc123").unwrap(),
            title: "x".to_string(),
            checked: false,
        };
        assert_eq!(row.detail_href(), "./?p=sha1-abc123");
    }
}
