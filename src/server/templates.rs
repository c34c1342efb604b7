//! HTML templates for the search page.
//!
//! Templates are plain string builders; the results container is rebuilt
//! from scratch on every render rather than diffed. When a search produced
//! no rows, the banner and collection controls are not emitted at all:
//! the page's "everything hidden" state.

use crate::search::ResultsView;

/// Base HTML template.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Permasearch</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/search" class="logo">Permasearch</a>
        </nav>
    </header>
    <main>
        {}
    </main>
</body>
</html>"#,
        html_escape(title),
        content
    )
}

/// Render the search page: the three search forms, and the result listing
/// with collection controls when there is anything to show.
pub fn search_page(view: &ResultsView) -> String {
    let mut content = String::new();

    content.push_str(
        r#"
    <form id="formTags" method="post" action="/search/tags">
        <label for="inputTag">Tagged with</label>
        <input id="inputTag" name="inputTag" type="text">
        <input type="submit" value="Search">
    </form>
    <form id="formTitles" method="post" action="/search/titles">
        <label for="inputTitle">Titled with</label>
        <input id="inputTitle" name="inputTitle" type="text">
        <input type="submit" value="Search">
    </form>
    <form id="formAnyAttr" method="post" action="/search/any">
        <label for="inputAnyAttr">Any attribute</label>
        <input id="inputAnyAttr" name="inputAnyAttr" type="text">
        <input type="submit" value="Search">
    </form>
    "#,
    );

    if let Some(banner) = &view.banner {
        content.push_str(&format!(
            r#"<h2 id="titleRes">{}</h2>
"#,
            html_escape(banner)
        ));
    }

    if view.controls_visible() {
        let mut rows = String::new();
        rows.push_str(
            r#"
            <input id="checkall" type="checkbox" name="checkall" onclick="checkAll();"><br>
        "#,
        );
        for row in &view.rows {
            let checked = if row.checked { " checked" } else { "" };
            rows.push_str(&format!(
                r#"
            <input type="checkbox" name="checkbox" value="{}"{}>
            <a href="{}">{}</a><br>
        "#,
                row.permanode,
                checked,
                row.detail_href(),
                html_escape(&row.title)
            ));
        }

        content.push_str(&format!(
            r#"
    <form id="formAddToCollec" method="post" action="/collection/add">
        <div id="divRes">{}</div>
        <button id="btnNewCollec" type="submit" name="create" value="1">New collection</button>
        <label for="inputCollec">or add to</label>
        <input id="inputCollec" name="collection" type="text" placeholder="collection permanode ref">
        <input type="submit" value="Add to collection">
    </form>
    <script>{}</script>
    "#,
            rows, CHECK_ALL_JS
        ));
    }

    base_template("Search", &content)
}

/// Render the error page, the blocking-alert analogue of the original UI.
pub fn alert_page(message: &str) -> String {
    let content = format!(
        r#"
    <div class="alert">{}</div>
    <p><a href="/search">Back to search</a></p>
    "#,
        html_escape(message)
    );
    base_template("Error", &content)
}

/// Minimal permanode detail stub, the navigation target of result links
/// and successful collection submissions.
pub fn detail_page(permanode: Option<&str>) -> String {
    let content = match permanode {
        Some(p) => format!(
            r#"
    <h2>Permanode</h2>
    <p class="blobref">{}</p>
    <p><a href="/search">Back to search</a></p>
    "#,
            html_escape(p)
        ),
        None => r#"
    <p><a href="/search">Go to search</a></p>
    "#
        .to_string(),
    };
    base_template("Permanode", &content)
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Mirrors the master checkbox onto every result checkbox.
const CHECK_ALL_JS: &str = r#"
function checkAll() {
    var checkall = document.getElementById('checkall');
    var checkboxes = document.getElementsByName('checkbox');
    for (var i = 0; i < checkboxes.length; i++) {
        checkboxes[i].checked = checkall.checked;
    }
}
"#;

/// Stylesheet.
pub const CSS: &str = r#"
:root {
    --border: #ccc;
    --text-muted: #666;
    --highlight: #f5f5f5;
}

body {
    font-family: monospace;
    margin: 0;
    color: #222;
}

#main-header {
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
}

#main-header .logo {
    font-weight: bold;
    text-decoration: none;
    color: inherit;
}

main {
    padding: 1rem;
    max-width: 720px;
}

form {
    margin: 0.5rem 0;
}

#divRes {
    border: 1px solid var(--border);
    padding: 0.5rem;
    margin: 0.5rem 0;
}

#divRes a {
    color: inherit;
}

.alert {
    border: 1px solid #c33;
    background: #fee;
    color: #900;
    padding: 0.75rem 1rem;
    margin: 1rem 0;
}

.blobref {
    background: var(--highlight);
    border: 1px solid var(--border);
    padding: 0.5rem;
    word-break: break-all;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobref::BlobRef;
    use crate::client::{AttrHit, SearchResult};
    use crate::search::{ResultsView, SearchParams};

    fn view_of(refs: &[&str]) -> ResultsView {
        let params = SearchParams::from_query("q=beach&t=tag");
        let result = SearchResult {
            with_attr: refs
                .iter()
                .map(|r| AttrHit {
                    permanode: BlobRef::parse(r).unwrap(),
                })
                .collect(),
            meta: Default::default(),
        };
        ResultsView::build(&params, &result)
    }

    #[test]
    fn renders_one_checkbox_per_row_plus_select_all() {
        let html = search_page(&view_of(&["sha1-aaa111", "sha1-bbb222", "sha1-ccc333"]));
        assert_eq!(html.matches(r#"name="checkbox""#).count(), 3);
        assert_eq!(html.matches(r#"id="checkall""#).count(), 1);
        assert!(html.contains(r#"href="./?p=sha1-aaa111""#));
        assert!(html.contains("Tagged with &quot;beach&quot;"));
        assert!(html.contains(r#"id="btnNewCollec""#));
    }

    #[test]
    fn empty_view_hides_result_ui() {
        let html = search_page(&ResultsView::empty());
        assert!(!html.contains(r#"name="checkbox""#));
        assert!(!html.contains(r#"id="titleRes""#));
        assert!(!html.contains(r#"id="btnNewCollec""#));
        assert!(!html.contains(r#"id="formAddToCollec""#));
        // The search forms themselves are always present.
        assert!(html.contains(r#"id="formTags""#));
        assert!(html.contains(r#"id="formTitles""#));
        assert!(html.contains(r#"id="formAnyAttr""#));
    }

    #[test]
    fn alert_page_escapes_message() {
        let html = alert_page("bad <input>");
        assert!(html.contains("bad &lt;input&gt;"));
    }

    #[test]
    fn detail_page_shows_ref() {
        let html = detail_page(Some("sha1-abc123"));
        assert!(html.contains("sha1-abc123"));
    }
}
