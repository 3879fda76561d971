//! HTML conversion
//!
//! `blocks_to_html` emits a standalone HTML document suitable for export;
//! `html_to_blocks` walks a parsed DOM tree and maps the elements it knows
//! back to blocks, descending into anything else.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::blocks::{self, BlockKind};

const HTML_HEADER: &str = "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Document</title><style>body{font-family:sans-serif;max-width:800px;margin:40px auto;padding:20px;line-height:1.6}</style></head><body>";
const HTML_FOOTER: &str = "</body></html>";

/// Render a block array as a standalone HTML document
///
/// Consecutive list items of one kind share a single `<ul>`/`<ol>`; the
/// open list closes when the kind changes or a non-list block intervenes.
pub fn blocks_to_html(blocks: &[Value]) -> String {
    let mut html = String::from(HTML_HEADER);
    // Currently open list tag, if any
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let text = blocks::block_text(block);
        match blocks::classify(block) {
            BlockKind::Paragraph => {
                close_list(&mut html, &mut open_list);
                html.push_str(&format!("<p>{}</p>", escape_html(&text)));
            }
            BlockKind::Heading { level } => {
                close_list(&mut html, &mut open_list);
                html.push_str(&format!(
                    "<h{level}>{}</h{level}>",
                    escape_html(&text)
                ));
            }
            BlockKind::BulletItem => {
                ensure_list(&mut html, &mut open_list, "ul");
                html.push_str(&format!("<li>{}</li>", escape_html(&text)));
            }
            BlockKind::NumberedItem => {
                ensure_list(&mut html, &mut open_list, "ol");
                html.push_str(&format!("<li>{}</li>", escape_html(&text)));
            }
            BlockKind::Image { url, alt } => {
                close_list(&mut html, &mut open_list);
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" style=\"max-width:100%;height:auto;\" />",
                    escape_html(&url),
                    escape_html(&alt)
                ));
            }
            BlockKind::Other(_) => {
                if !text.is_empty() {
                    close_list(&mut html, &mut open_list);
                    html.push_str(&format!("<p>{}</p>", escape_html(&text)));
                }
            }
        }
    }

    close_list(&mut html, &mut open_list);
    html.push_str(HTML_FOOTER);
    html
}

fn ensure_list(html: &mut String, open_list: &mut Option<&'static str>, tag: &'static str) {
    if *open_list != Some(tag) {
        close_list(html, open_list);
        html.push_str(&format!("<{}>", tag));
        *open_list = Some(tag);
    }
}

fn close_list(html: &mut String, open_list: &mut Option<&'static str>) {
    if let Some(tag) = open_list.take() {
        html.push_str(&format!("</{}>", tag));
    }
}

/// Escape text for insertion into HTML body or attribute context
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Parse HTML into a block array via a DOM-tree walk
///
/// `h1`-`h3`, `ul`/`ol`, `p`, and `img` map directly; any other element is
/// descended into when it has element children, or flattened to one
/// paragraph when it only has text. A parse that yields nothing from a
/// source that still has text falls back to a single paragraph.
pub fn html_to_blocks(html: &str) -> Vec<Value> {
    let document = Html::parse_document(html);
    let mut result = Vec::new();

    let Some(body_selector) = Selector::parse("body").ok() else {
        return result;
    };
    let Some(body) = document.select(&body_selector).next() else {
        return result;
    };

    for child in body.children() {
        if let Some(element) = ElementRef::wrap(child) {
            process_element(element, &mut result);
        }
    }

    if result.is_empty() {
        let text = flattened_text(body);
        if !text.is_empty() {
            result.push(blocks::paragraph(&text));
        }
    }
    result
}

fn process_element(element: ElementRef<'_>, out: &mut Vec<Value>) {
    match element.value().name() {
        "h1" | "h2" | "h3" => {
            let level = match element.value().name() {
                "h1" => 1,
                "h2" => 2,
                _ => 3,
            };
            let text = flattened_text(element);
            if !text.is_empty() {
                out.push(blocks::heading(level, &text));
            }
        }
        "ul" => push_list_items(element, out, blocks::bullet_item),
        "ol" => push_list_items(element, out, blocks::numbered_item),
        "p" => {
            let text = flattened_text(element);
            if !text.is_empty() {
                out.push(blocks::paragraph(&text));
            }
        }
        "img" => {
            let src = element.value().attr("src").unwrap_or("");
            if !src.is_empty() {
                let alt = element.value().attr("alt").unwrap_or("");
                out.push(blocks::image(src, alt));
            }
        }
        _ => {
            let mut element_children = element
                .children()
                .filter_map(ElementRef::wrap)
                .peekable();
            if element_children.peek().is_some() {
                for child in element.children() {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        process_element(child_element, out);
                    }
                }
            } else {
                let text = flattened_text(element);
                if !text.is_empty() {
                    out.push(blocks::paragraph(&text));
                }
            }
        }
    }
}

fn push_list_items(
    list: ElementRef<'_>,
    out: &mut Vec<Value>,
    make_item: fn(&str) -> Value,
) {
    for item in list.children().filter_map(ElementRef::wrap) {
        let text = flattened_text(item);
        if !text.is_empty() {
            out.push(make_item(&text));
        }
    }
}

fn flattened_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_of(html: &str) -> &str {
        let start = html.find("<body>").unwrap() + "<body>".len();
        let end = html.find("</body>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_consecutive_bullets_share_one_list() {
        let blocks = vec![
            json!({ "type": "bulletListItem", "content": "x" }),
            json!({ "type": "bulletListItem", "content": "y" }),
        ];
        assert_eq!(
            body_of(&blocks_to_html(&blocks)),
            "<ul><li>x</li><li>y</li></ul>"
        );
    }

    #[test]
    fn test_list_closes_when_kind_changes() {
        let blocks = vec![
            json!({ "type": "bulletListItem", "content": "a" }),
            json!({ "type": "numberedListItem", "content": "b" }),
            json!({ "type": "bulletListItem", "content": "c" }),
        ];
        assert_eq!(
            body_of(&blocks_to_html(&blocks)),
            "<ul><li>a</li></ul><ol><li>b</li></ol><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn test_list_closes_when_paragraph_intervenes() {
        let blocks = vec![
            json!({ "type": "bulletListItem", "content": "a" }),
            json!({ "type": "paragraph", "content": "break" }),
            json!({ "type": "bulletListItem", "content": "b" }),
        ];
        assert_eq!(
            body_of(&blocks_to_html(&blocks)),
            "<ul><li>a</li></ul><p>break</p><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_trailing_list_is_closed() {
        let blocks = vec![json!({ "type": "numberedListItem", "content": "last" })];
        assert_eq!(body_of(&blocks_to_html(&blocks)), "<ol><li>last</li></ol>");
    }

    #[test]
    fn test_text_is_escaped() {
        let blocks = vec![json!({ "type": "paragraph", "content": "<script>alert('x') & more" })];
        assert_eq!(
            body_of(&blocks_to_html(&blocks)),
            "<p>&lt;script&gt;alert(&#39;x&#39;) &amp; more</p>"
        );
    }

    #[test]
    fn test_image_attributes_escaped() {
        let blocks = vec![json!({
            "type": "image",
            "props": { "url": "https://a.example/x.png?a=1&b=\"2\"", "altText": "a<b>" }
        })];
        let body = body_of(&blocks_to_html(&blocks)).to_string();
        assert!(body.contains("src=\"https://a.example/x.png?a=1&amp;b=&quot;2&quot;\""));
        assert!(body.contains("alt=\"a&lt;b&gt;\""));
    }

    #[test]
    fn test_heading_levels() {
        let blocks = vec![
            json!({ "type": "heading", "props": { "level": 1 }, "content": "One" }),
            json!({ "type": "heading", "props": { "level": 3 }, "content": "Three" }),
        ];
        assert_eq!(
            body_of(&blocks_to_html(&blocks)),
            "<h1>One</h1><h3>Three</h3>"
        );
    }

    #[test]
    fn test_parse_headings_and_paragraphs() {
        let parsed = html_to_blocks("<h1>Title</h1><h2>Sub</h2><p>body text</p>");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], blocks::heading(1, "Title"));
        assert_eq!(parsed[1], blocks::heading(2, "Sub"));
        assert_eq!(parsed[2], blocks::paragraph("body text"));
    }

    #[test]
    fn test_parse_lists() {
        let parsed = html_to_blocks("<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>");
        assert_eq!(parsed[0], blocks::bullet_item("a"));
        assert_eq!(parsed[1], blocks::bullet_item("b"));
        assert_eq!(parsed[2], blocks::numbered_item("c"));
    }

    #[test]
    fn test_parse_image() {
        let parsed = html_to_blocks(r#"<img src="https://a.example/i.png" alt="pic">"#);
        assert_eq!(parsed, vec![blocks::image("https://a.example/i.png", "pic")]);
    }

    #[test]
    fn test_image_without_src_skipped() {
        let parsed = html_to_blocks("<img alt=\"no src\"><p>after</p>");
        assert_eq!(parsed, vec![blocks::paragraph("after")]);
    }

    #[test]
    fn test_empty_heading_skipped() {
        let parsed = html_to_blocks("<h1>   </h1><p>kept</p>");
        assert_eq!(parsed, vec![blocks::paragraph("kept")]);
    }

    #[test]
    fn test_descends_into_wrapper_elements() {
        let parsed = html_to_blocks("<div><section><h2>Deep</h2><p>nested</p></section></div>");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], blocks::heading(2, "Deep"));
        assert_eq!(parsed[1], blocks::paragraph("nested"));
    }

    #[test]
    fn test_text_only_element_becomes_paragraph() {
        let parsed = html_to_blocks("<div>bare words</div>");
        assert_eq!(parsed, vec![blocks::paragraph("bare words")]);
    }

    #[test]
    fn test_fallback_paragraph_from_body_text() {
        // Body text with no mappable elements still yields one paragraph
        let parsed = html_to_blocks("loose text only");
        assert_eq!(parsed, vec![blocks::paragraph("loose text only")]);
    }

    #[test]
    fn test_empty_source_yields_no_blocks() {
        assert!(html_to_blocks("").is_empty());
        assert!(html_to_blocks("<div>   </div>").is_empty());
    }

    #[test]
    fn test_export_import_round_trip() {
        let blocks = vec![
            json!({ "type": "heading", "props": { "level": 1 }, "content": "Doc" }),
            json!({ "type": "paragraph", "content": "intro" }),
            json!({ "type": "bulletListItem", "content": "a" }),
            json!({ "type": "bulletListItem", "content": "b" }),
        ];
        let parsed = html_to_blocks(&blocks_to_html(&blocks));
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0], blocks::heading(1, "Doc"));
        assert_eq!(parsed[3], blocks::bullet_item("b"));
    }
}
