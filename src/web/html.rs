// HTML rendering helpers
//
// Pages are plain strings; every user-supplied value goes through `escape`.

use crate::page::Page;
use axum::response::Html;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page with the shared navigation bar.
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/archaeological-sites">Sites</a> | <a href="/national-parks">Parks</a> | <a href="/expenses">Expenses</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body
    ))
}

/// Encode the non-empty filter values as a query string (no leading `?`).
pub fn query_string(pairs: &[(&str, Option<String>)]) -> String {
    pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Previous/next links that keep the active filters.
pub fn pagination<T>(base: &str, filters: &str, page: &Page<T>) -> String {
    let link = |number: usize, label: &str| {
        let mut query = format!("pageNum={}&pageSize={}", number, page.size);
        if !filters.is_empty() {
            query.push('&');
            query.push_str(filters);
        }
        format!(r#"<a href="{}?{}">{}</a>"#, base, escape(&query), label)
    };

    let mut parts = Vec::new();
    if page.has_previous() {
        parts.push(link(page.number, "« Previous"));
    }
    parts.push(format!(
        "Page {} of {} ({} total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    ));
    if page.has_next() {
        parts.push(link(page.number + 2, "Next »"));
    }

    format!(r#"<p class="pagination">{}</p>"#, parts.join(" "))
}

/// `<option>` list with `selected` set on the matching value.
pub fn options<I>(choices: I, selected: Option<&str>, blank: bool) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut html = String::new();
    if blank {
        html.push_str(r#"<option value="">Any</option>"#);
    }
    for (value, label) in choices {
        let marker = if selected == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape(&value),
            marker,
            escape(&label)
        ));
    }
    html
}

pub fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label>{} <input type="text" name="{}" value="{}"></label>"#,
        escape(label),
        name,
        escape(value)
    )
}

pub fn number_input(name: &str, label: &str, value: &str, step: &str) -> String {
    format!(
        r#"<label>{} <input type="number" step="{}" name="{}" value="{}"></label>"#,
        escape(label),
        step,
        name,
        escape(value)
    )
}

/// Single-button form posting to `action`.
pub fn post_button(action: &str, label: &str) -> String {
    format!(
        r#"<form method="post" action="{}" style="display:inline"><button type="submit">{}</button></form>"#,
        escape(action),
        escape(label)
    )
}

pub fn error_page(title: &str, message: &str) -> Html<String> {
    layout(title, &format!("<p>{}</p>", escape(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageRequest;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_query_string_skips_blank_values() {
        let query = query_string(&[
            ("name", Some("Heraclea Lyncestis".to_string())),
            ("rating", None),
            ("period", Some(String::new())),
        ]);
        assert_eq!(query, "name=Heraclea%20Lyncestis");
    }

    #[test]
    fn test_pagination_links_keep_filters() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2).unwrap(), 6);
        let html = pagination("/archaeological-sites", "name=Stobi", &page);

        assert!(html.contains(r#"href="/archaeological-sites?pageNum=1&amp;pageSize=2&amp;name=Stobi""#));
        assert!(html.contains(r#"href="/archaeological-sites?pageNum=3&amp;pageSize=2&amp;name=Stobi""#));
        assert!(html.contains("Page 2 of 3 (6 total)"));
    }

    #[test]
    fn test_options_marks_selection() {
        let html = options(
            vec![("1".to_string(), "Ohrid".to_string()), ("2".to_string(), "Bitola".to_string())],
            Some("2"),
            true,
        );
        assert!(html.starts_with(r#"<option value="">Any</option>"#));
        assert!(html.contains(r#"<option value="2" selected>Bitola</option>"#));
    }
}
