//! HTML fragments for result lists
//!
//! Used for exporting a result list as a standalone page: card, table
//! and image gallery views of the same records.

use super::model::CatalogItem;
use super::render::ItemCard;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:left;vertical-align:top}\
.card{border:1px solid #ccc;border-radius:8px;padding:1rem;margin:.5rem 0}\
.caption{color:#666}\
.gallery{display:flex;flex-wrap:wrap;gap:1rem}\
.gallery figure{width:200px;margin:0}\
.gallery img{max-width:200px;max-height:200px}";

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
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

fn link(url: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\">{}</a>",
        escape_html(url),
        escape_html(label)
    )
}

fn manual_links(item: &CatalogItem) -> String {
    item.manuals
        .iter()
        .enumerate()
        .map(|(i, url)| link(url, &format!("{}", i + 1)))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// One record as a card `<div>`
pub fn render_card(item: &CatalogItem) -> String {
    let card = ItemCard::from_item(item);
    let mut html = String::from("<div class=\"card\">");

    html.push_str(&format!("<h3>{}</h3>", escape_html(&card.title)));
    html.push_str(&format!(
        "<p class=\"caption\">{}</p>",
        escape_html(&card.caption)
    ));
    html.push_str(&format!("<p>{}</p>", escape_html(&card.detail)));

    if let Some(src) = item.image().to_src() {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" style=\"max-width:240px\">",
            escape_html(&src),
            escape_html(item.display_name())
        ));
    }
    if let Some(page) = &card.official_page {
        html.push_str(&format!("<p>{}</p>", link(&page.url, &page.label)));
    }
    if !item.manuals.is_empty() {
        html.push_str(&format!(
            "<p><strong>📘 Manuales:</strong> {}</p>",
            manual_links(item)
        ));
    }
    if let Some(minifigs) = &card.minifigs {
        html.push_str(&format!(
            "<p><strong>🧍 Minifigs:</strong> {}</p>",
            escape_html(minifigs)
        ));
    }

    html.push_str("</div>");
    html
}

/// One record as a table row, columns matching `render_table`'s header
pub fn render_row(item: &CatalogItem) -> String {
    let card = ItemCard::from_item(item);
    let cell = |v: &str| format!("<td>{}</td>", escape_html(v));
    let num = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();

    let mut row = String::from("<tr>");
    row.push_str(&cell(&num(item.set_number)));
    row.push_str(&cell(item.display_name()));
    row.push_str(&cell(item.theme.as_deref().unwrap_or("")));
    row.push_str(&cell(&num(item.year)));
    row.push_str(&cell(&num(item.pieces)));
    row.push_str(&cell(item.condition.as_deref().unwrap_or("")));
    row.push_str(&cell(item.storage.as_deref().unwrap_or("")));
    row.push_str(&cell(&num(item.storage_box())));
    row.push_str(&format!(
        "<td>{}</td>",
        card.official_page
            .as_ref()
            .map(|p| link(&p.url, "LEGO"))
            .unwrap_or_default()
    ));
    row.push_str(&format!("<td>{}</td>", manual_links(item)));
    row.push_str(&cell(card.minifigs.as_deref().unwrap_or("")));
    row.push_str("</tr>");
    row
}

pub fn render_table(items: &[CatalogItem]) -> String {
    let header = [
        "Set", "Nombre", "Tema", "Año", "Piezas", "Estado", "Ubicación", "Caja", "Web",
        "Manuales", "Minifigs",
    ]
    .iter()
    .map(|h| format!("<th>{h}</th>"))
    .collect::<String>();

    let rows = items.iter().map(render_row).collect::<String>();
    format!("<table><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table>")
}

/// Image gallery of the records that have one
pub fn render_gallery(items: &[CatalogItem]) -> String {
    let figures = items
        .iter()
        .filter_map(|item| {
            let src = item.image().to_src()?;
            let card = ItemCard::from_item(item);
            Some(format!(
                "<figure><img src=\"{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>",
                escape_html(&src),
                escape_html(item.display_name()),
                escape_html(&card.title)
            ))
        })
        .collect::<String>();

    format!("<div class=\"gallery\">{figures}</div>")
}

/// Standalone page: answer, table, gallery and cards
pub fn render_page(title: &str, answer: &str, items: &[CatalogItem]) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str(&format!("<style>{STYLE}</style></head><body>"));
    html.push_str(&format!("<h1>{}</h1>", escape_html(title)));

    if !answer.is_empty() {
        html.push_str(&format!("<p><strong>{}</strong></p>", escape_html(answer)));
    }

    if items.is_empty() {
        html.push_str("<p>Sin resultados</p>");
    } else {
        html.push_str(&render_table(items));
        html.push_str("<h2>Galería</h2>");
        html.push_str(&render_gallery(items));
        html.push_str("<h2>Fichas</h2>");
        for item in items {
            html.push_str(&render_card(item));
        }
    }

    html.push_str("</body></html>");
    html
}
