//! Official product page scraping for admin autofill
//!
//! Pages change without notice; every extractor is optional and a miss
//! just leaves the field for the user to type.

use crate::catalog::FormField;
use crate::state::{SharedState, write_state};
use crate::types::LoadingState;
use anyhow::{Result, bail};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector"));
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static PIECES_ATTR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-test*="pieces"], [data-test*="piece-count"]"#)
        .expect("valid selector")
});
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("valid selector"));

static PIECES_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:[.,]\d{3})+|\d+)\s*(?:piezas|pieces)").expect("valid regex")
});
static YEAR_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:año|year)\D{0,20}((?:19|20)\d{2})").expect("valid regex")
});
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d.,]*").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub pieces: Option<i64>,
    pub year: Option<i64>,
}

impl ProductPage {
    /// Values for the admin form, in form order
    pub fn form_values(&self) -> Vec<(FormField, String)> {
        let mut values = Vec::new();
        if let Some(name) = &self.name {
            values.push((FormField::Name, name.clone()));
        }
        if let Some(year) = self.year {
            values.push((FormField::Year, year.to_string()));
        }
        if let Some(pieces) = self.pieces {
            values.push((FormField::Pieces, pieces.to_string()));
        }
        if let Some(image) = &self.image_url {
            values.push((FormField::ImageUrl, image.clone()));
        }
        values
    }
}

pub fn parse_product_page(html: &str) -> ProductPage {
    let document = Html::parse_document(html);

    let meta = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    };

    let name = meta(&OG_TITLE)
        .or_else(|| {
            document
                .select(&H1)
                .next()
                .map(|h1| h1.text().collect::<String>())
        })
        .map(|title| clean_title(&title))
        .filter(|t| !t.is_empty());

    let image_url = meta(&OG_IMAGE);

    let body_text = document
        .select(&BODY)
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let pieces = document
        .select(&PIECES_ATTR)
        .find_map(|el| {
            let text = el.text().collect::<String>();
            DIGITS.find(&text).and_then(|m| parse_count(m.as_str()))
        })
        .or_else(|| {
            PIECES_TEXT
                .captures(&body_text)
                .and_then(|c| parse_count(&c[1]))
        });

    let year = YEAR_TEXT
        .captures(&body_text)
        .and_then(|c| c[1].parse().ok());

    ProductPage {
        name,
        image_url,
        pieces,
        year,
    }
}

/// "Millennium Falcon™ | LEGO® Star Wars™ | Tienda" -> "Millennium Falcon™"
fn clean_title(title: &str) -> String {
    let title = title.split(" | ").next().unwrap_or(title);
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "7,541" / "7.541" / "7541" -> 7541
fn parse_count(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok().filter(|n| *n > 0)
}

pub async fn fetch_product_page(client: &reqwest::Client, url: &str) -> Result<ProductPage> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("Product page returned {}", status);
    }
    let html = response.text().await?;
    Ok(parse_product_page(&html))
}

/// Fetch the page and fill only the admin fields that are still empty
pub fn autofill_background(state: SharedState, client: reqwest::Client, url: String) {
    write_state(&state).admin.autofill = LoadingState::Loading;

    tokio::spawn(async move {
        let result = fetch_product_page(&client, &url).await;
        let mut s = write_state(&state);
        match result {
            Ok(page) => {
                let filled = s.admin.fill_empty(&page.form_values());
                tracing::info!(%url, filled = filled.len(), "autofill complete");
                s.ui.status = Some(if filled.is_empty() {
                    "Autocompletar: nada nuevo".to_string()
                } else {
                    let names: Vec<&str> = filled.iter().map(|f| f.label()).collect();
                    format!("Autocompletado: {}", names.join(", "))
                });
                s.admin.autofill = LoadingState::Complete;
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "autofill failed");
                s.admin.autofill = LoadingState::Error(e.to_string());
            }
        }
    });
}
