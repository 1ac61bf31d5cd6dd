use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{Html, IntoResponse, Response},
};

const TEMPLATE: &str = include_str!("home.html");

const NAME_COOKIE: &str = "name";
const DEFAULT_NAME: &str = "Unknown";
const GUEST_COOKIE: &str = "name=Guest; Path=/; Max-Age=60";

/// Serves the home page for any path outside the API.
///
/// Greets the visitor by the `name` cookie. First-time visitors are greeted
/// as "Unknown" and handed a short-lived guest cookie.
pub async fn home_page(headers: HeaderMap) -> Response {
    let cookie = name_cookie(&headers);
    let name = cookie.as_deref().unwrap_or(DEFAULT_NAME);

    let mut response = Html(render(name)).into_response();
    if cookie.is_none() {
        response
            .headers_mut()
            .insert(SET_COOKIE, HeaderValue::from_static(GUEST_COOKIE));
    }
    response
}

fn render(name: &str) -> String {
    TEMPLATE.replace("{name}", &escape_html(name))
}

fn name_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == NAME_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
