//! Request handlers for the search UI.

use std::sync::OnceLock;

use axum::extract::{RawForm, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use regex::Regex;
use tracing::warn;

use super::templates;
use super::AppState;
use crate::blobref::BlobRef;
use crate::collection::{add_to_collection, CollectionError, CollectionTarget};
use crate::search::{run_search, ResultsView, SearchParams};

/// Separator for multi-value search inputs. Only the first value is ever
/// used; the rest are accepted and dropped.
fn comma_split() -> &'static Regex {
    static SPLIT: OnceLock<Regex> = OnceLock::new();
    SPLIT.get_or_init(|| Regex::new(r"\s*,\s*").expect("valid separator pattern"))
}

/// First comma-separated token of a form input, or `None` for an empty
/// input (which submits nowhere).
pub fn first_token(input: &str) -> Option<&str> {
    if input.is_empty() {
        return None;
    }
    comma_split().split(input).next()
}

/// Search URL a form submission navigates to.
pub fn search_redirect_url(token: &str, kind: Option<&str>) -> String {
    let mut url = format!("/search?q={}", urlencoding::encode(token));
    if let Some(t) = kind {
        url.push_str(&format!("&t={}", t));
    }
    url
}

/// Decode an urlencoded form body into (name, value) pairs, in document
/// order. Checkbox ordering matters for the tick-set.
fn form_fields(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn field_value<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn alert(status: StatusCode, message: &str) -> Response {
    (status, Html(templates::alert_page(message))).into_response()
}

/// `GET /search`: the search page. Dispatches a store search when `q` is
/// present, renders the bare page otherwise.
pub async fn search_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = SearchParams::from_query(query.as_deref().unwrap_or(""));
    match run_search(state.store.as_ref(), &params).await {
        Ok(Some(result)) => {
            let view = ResultsView::build(&params, &result);
            Html(templates::search_page(&view)).into_response()
        }
        Ok(None) => Html(templates::search_page(&ResultsView::empty())).into_response(),
        Err(e) => {
            warn!(error = %e, "search failed");
            alert(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

fn form_search_redirect(body: &[u8], input_name: &str, kind: Option<&str>) -> Response {
    let fields = form_fields(body);
    match field_value(&fields, input_name).and_then(first_token) {
        Some(token) => Redirect::to(&search_redirect_url(token, kind)).into_response(),
        // Empty input submits nowhere: re-render the bare page in place,
        // no navigation and no search.
        None => Html(templates::search_page(&ResultsView::empty())).into_response(),
    }
}

/// `POST /search/tags`
pub async fn tag_form(RawForm(body): RawForm) -> Response {
    form_search_redirect(&body, "inputTag", Some("tag"))
}

/// `POST /search/titles`
pub async fn title_form(RawForm(body): RawForm) -> Response {
    form_search_redirect(&body, "inputTitle", Some("title"))
}

/// `POST /search/any`
pub async fn any_attr_form(RawForm(body): RawForm) -> Response {
    form_search_redirect(&body, "inputAnyAttr", None)
}

/// `POST /collection/add`: put the ticked permanodes into a new or
/// existing collection and navigate to it.
pub async fn collection_form(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Response {
    let fields = form_fields(body.as_ref());

    let mut ticked = Vec::new();
    for (name, value) in &fields {
        if name != "checkbox" {
            continue;
        }
        match BlobRef::parse(value) {
            Some(r) => ticked.push(r),
            None => {
                return alert(
                    StatusCode::BAD_REQUEST,
                    &format!("Not a valid permanode ref: {value:?}"),
                )
            }
        }
    }

    let target = if field_value(&fields, "create").is_some() {
        CollectionTarget::New
    } else {
        CollectionTarget::Existing(
            field_value(&fields, "collection").unwrap_or_default().to_string(),
        )
    };

    match add_to_collection(state.store.as_ref(), &ticked, target).await {
        Ok(parent) => Redirect::to(&format!("/?p={}", parent)).into_response(),
        Err(e @ CollectionError::EmptySelection)
        | Err(e @ CollectionError::InvalidCollectionRef(_)) => {
            alert(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            warn!(error = %e, "collection submission failed");
            alert(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

/// `GET /`: permanode detail stub, target of `./?p=<ref>` links.
pub async fn detail_page(RawQuery(query): RawQuery) -> Html<String> {
    let permanode = query.as_deref().and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "p")
            .map(|(_, v)| v.into_owned())
    });
    Html(templates::detail_page(permanode.as_deref()))
}

/// `GET /static/style.css`
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_token_takes_only_the_first_value() {
        assert_eq!(first_token("a, b, c"), Some("a"));
        assert_eq!(first_token("single"), Some("single"));
        assert_eq!(first_token("spaced ,next"), Some("spaced"));
        assert_eq!(first_token(""), None);
    }

    #[test]
    fn redirect_url_shape() {
        assert_eq!(search_redirect_url("a", Some("tag")), "/search?q=a&t=tag");
        assert_eq!(
            search_redirect_url("summer trip", Some("title")),
            "/search?q=summer%20trip&t=title"
        );
        assert_eq!(search_redirect_url("a", None), "/search?q=a");
    }

    #[test]
    fn form_fields_keep_document_order() {
        let fields = form_fields(b"checkbox=sha1-aaa&checkbox=sha1-bbb&collection=x");
        assert_eq!(fields[0], ("checkbox".to_string(), "sha1-aaa".to_string()));
        assert_eq!(fields[1], ("checkbox".to_string(), "sha1-bbb".to_string()));
        assert_eq!(field_value(&fields, "collection"), Some("x"));
        assert_eq!(field_value(&fields, "create"), None);
    }
}
