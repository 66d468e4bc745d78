use std::ops::Deref;

use axum::response::{Html, IntoResponse, Response};
use pulldown_cmark::{Event, Options, Parser};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markdown to HTML. With `trusted == false` any raw HTML in the source is
/// shown as text instead of being passed through.
pub fn markdown_to_html(source: &str, trusted: bool) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) if !trusted => Event::Text(html),
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Renders a bundled markdown page.
pub struct Markdown<T>(pub T);

impl<T> IntoResponse for Markdown<T>
where
    T: Deref<Target = str>,
{
    fn into_response(self) -> Response {
        Html(markdown_to_html(&self.0, true)).into_response()
    }
}
