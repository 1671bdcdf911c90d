//! Page layout, shared styles and the role selector

use axum::{
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

pub const TITLE: &str = "Mall Customer Segmentation";

const STYLE: &str = r#"
    body {
        background-color: #2F4F4F;
        color: #FFFFFF;
        font-family: 'Arial', sans-serif;
        max-width: 900px;
        margin: 40px auto;
        padding: 0 20px;
    }
    .title {
        font-size: 45px;
        font-weight: bold;
        text-align: center;
        color: #00FA9A;
    }
    .header {
        font-size: 25px;
        color: #00CED1;
        font-weight: bold;
        margin: 20px 0 10px;
    }
    .subheader {
        font-size: 20px;
        color: #FFF8DC;
        margin: 20px 0 10px;
    }
    label {
        display: block;
        margin-top: 12px;
    }
    input[type=text], input[type=email], input[type=password] {
        background-color: #F0F8FF;
        color: black;
        font-size: 16px;
        width: 100%;
        padding: 6px;
    }
    input[type=range] {
        width: 100%;
    }
    select {
        background-color: #FFE4B5;
        color: black;
        font-size: 16px;
        padding: 6px;
    }
    button {
        background-color: #FFA500;
        color: white;
        font-size: 18px;
        border: none;
        border-radius: 5px;
        padding: 8px 20px;
        margin-top: 16px;
        cursor: pointer;
    }
    .success { background-color: #2E8B57; padding: 10px; border-radius: 5px; margin: 10px 0; }
    .error { background-color: #B22222; padding: 10px; border-radius: 5px; margin: 10px 0; }
    .cluster-result {
        background-color: #708090;
        color: white;
        padding: 10px;
        border-radius: 10px;
        margin: 6px 0;
    }
    table { border-collapse: collapse; width: 100%; }
    th, td { border: 1px solid #708090; padding: 4px 8px; text-align: left; }
    a { color: #00CED1; }
"#;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Wrap a page body in the shared layout
pub fn page(body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="title">{title}</div>
    {body}
    <p><a href="/">Back to role selection</a></p>
</body>
</html>"#,
        title = TITLE,
        style = STYLE,
        body = body,
    ))
}

pub fn success(message: &str) -> String {
    format!(r#"<div class="success">{}</div>"#, escape_html(message))
}

pub fn error(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, escape_html(message))
}

/// Query parameters for the role selector
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// GET /
///
/// Role selector. Submitting it redirects to the matching screen.
pub async fn serve_index(Query(query): Query<RoleQuery>) -> Response {
    match query.role.as_deref() {
        Some("customer") => Redirect::to("/customer").into_response(),
        Some("owner") => Redirect::to("/owner").into_response(),
        _ => page(
            r#"
    <form method="get" action="/">
        <label for="role">Are you a Customer or Mall Owner?</label>
        <select id="role" name="role">
            <option value="customer">Customer</option>
            <option value="owner">Mall Owner</option>
        </select>
        <button type="submit">Continue</button>
    </form>"#,
        )
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_page_contains_title_and_body() {
        let Html(html) = page("<p>hello</p>");
        assert!(html.contains(TITLE));
        assert!(html.contains("<p>hello</p>"));
    }
}
