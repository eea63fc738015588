//! Display form of a catalog record
//!
//! `ItemCard` holds the already-formatted pieces of a result card. The
//! terminal UI styles them; the HTML exporter escapes and wraps them.

use super::model::{CatalogItem, ImageRef};

/// A labelled link shown under a card
#[derive(Debug, Clone, PartialEq)]
pub struct CardLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemCard {
    /// `75192 · Millennium Falcon`
    pub title: String,
    /// `Star Wars · 2017`
    pub caption: String,
    /// `🧩 7541 piezas · 🏠 Trastero · 📦 Caja 3 · 🎁 Nuevo`
    pub detail: String,
    pub image: Option<CardLink>,
    pub official_page: Option<CardLink>,
    pub manuals: Vec<CardLink>,
    /// `Han Solo (sw0001), Chewbacca (sw0002)`
    pub minifigs: Option<String>,
    pub tags: Vec<String>,
}

impl ItemCard {
    pub fn from_item(item: &CatalogItem) -> Self {
        let title = format!(
            "{} · {}",
            display_opt(item.set_number),
            item.display_name()
        );
        let caption = format!(
            "{} · {}",
            item.theme.as_deref().unwrap_or(""),
            display_opt(item.year)
        );

        let mut detail = format!(
            "🧩 {} piezas · 🏠 {}",
            display_opt(item.pieces),
            item.storage.as_deref().unwrap_or("")
        );
        if let Some(storage_box) = item.storage_box() {
            detail.push_str(&format!(" · 📦 Caja {storage_box}"));
        }
        detail.push_str(&format!(" · 🎁 {}", item.condition.as_deref().unwrap_or("")));

        let image = match item.image() {
            ImageRef::Url(url) => Some(CardLink {
                label: "🖼️ Imagen del set".to_string(),
                url,
            }),
            ImageRef::Inline { bytes, .. } => Some(CardLink {
                label: format!("🖼️ Imagen incrustada ({} bytes)", bytes.len()),
                url: String::new(),
            }),
            ImageRef::None => None,
        };

        let official_page = item.lego_web_url.as_ref().map(|url| CardLink {
            label: "🌐 Página oficial LEGO".to_string(),
            url: url.clone(),
        });

        let manuals = item
            .manuals
            .iter()
            .enumerate()
            .map(|(i, url)| CardLink {
                label: format!("{} · Ver", i + 1),
                url: url.clone(),
            })
            .collect();

        let pairs = item.minifigs();
        let minifigs = if pairs.is_empty() {
            None
        } else {
            Some(
                pairs
                    .iter()
                    .map(|(name, code)| format!("{name} ({code})"))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };

        Self {
            title,
            caption,
            detail,
            image,
            official_page,
            manuals,
            minifigs,
            tags: item.tags.clone(),
        }
    }

    /// Plain-text rendering, one entry per line
    pub fn to_text_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            self.caption.clone(),
            self.detail.clone(),
        ];

        for link in self.image.iter().chain(self.official_page.iter()) {
            if link.url.is_empty() {
                lines.push(link.label.clone());
            } else {
                lines.push(format!("{}: {}", link.label, link.url));
            }
        }

        if !self.manuals.is_empty() {
            lines.push(format!(
                "📘 Manuales: {}",
                self.manuals
                    .iter()
                    .map(|m| format!("{} {}", m.label, m.url))
                    .collect::<Vec<_>>()
                    .join(" · ")
            ));
        }

        if let Some(minifigs) = &self.minifigs {
            lines.push(format!("🧍 Minifigs: {minifigs}"));
        }

        if !self.tags.is_empty() {
            lines.push(format!("🏷️ {}", self.tags.join(", ")));
        }

        lines
    }
}

fn display_opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falcon() -> CatalogItem {
        CatalogItem {
            set_number: Some(75192),
            name: Some("Millennium Falcon".into()),
            theme: Some("Star Wars".into()),
            year: Some(2017),
            pieces: Some(7541),
            storage: Some("Trastero".into()),
            storage_box: Some(3),
            condition: Some("Nuevo".into()),
            image_url: Some("https://drive.google.com/file/d/IMG/view".into()),
            lego_web_url: Some("https://www.lego.com/es-es/product/75192".into()),
            manuals: vec!["https://m/1.pdf".into(), "https://m/2.pdf".into()],
            minifig_names: vec!["Han Solo".into(), "Chewbacca".into()],
            minifigs_numbers: vec!["sw0001".into(), "sw0002".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_card_fields() {
        let card = ItemCard::from_item(&falcon());
        assert_eq!(card.title, "75192 · Millennium Falcon");
        assert_eq!(card.caption, "Star Wars · 2017");
        assert_eq!(card.detail, "🧩 7541 piezas · 🏠 Trastero · 📦 Caja 3 · 🎁 Nuevo");
        assert_eq!(
            card.image.unwrap().url,
            "https://drive.google.com/uc?export=view&id=IMG"
        );
        assert_eq!(card.manuals[1].label, "2 · Ver");
        assert_eq!(
            card.minifigs.as_deref(),
            Some("Han Solo (sw0001), Chewbacca (sw0002)")
        );
    }

    #[test]
    fn test_box_zero_is_hidden() {
        let item = CatalogItem {
            storage_box: Some(0),
            ..falcon()
        };
        let card = ItemCard::from_item(&item);
        assert!(!card.detail.contains("Caja"));
    }

    #[test]
    fn test_minifigs_need_both_lists() {
        let item = CatalogItem {
            minifigs_numbers: vec![],
            ..falcon()
        };
        assert_eq!(ItemCard::from_item(&item).minifigs, None);
    }

    #[test]
    fn test_empty_record_defaults() {
        let card = ItemCard::from_item(&CatalogItem::default());
        assert_eq!(card.title, " · Sin nombre");
        assert!(card.image.is_none());
        assert!(card.official_page.is_none());
        assert_eq!(card.to_text_lines().len(), 3);
    }

    #[test]
    fn test_text_lines() {
        let lines = ItemCard::from_item(&falcon()).to_text_lines();
        assert!(lines.iter().any(|l| l.starts_with("📘 Manuales: 1 · Ver https://m/1.pdf")));
        assert!(lines.iter().any(|l| l == "🧍 Minifigs: Han Solo (sw0001), Chewbacca (sw0002)"));
    }
}
