//! Catalog record type
//!
//! Records come from several backend variants that disagree on types
//! (numbers as strings, lists as comma-separated text). Parsing here never
//! fails a whole record: a bad field becomes `None` or an empty list.

use super::links::normalize_drive_link;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Map, Value};

/// One catalog item as last seen at the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_box: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lego_web_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manuals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub minifig_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub minifigs_numbers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Where the primary image of a record lives
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    Url(String),
    Inline { mime: String, bytes: Vec<u8> },
    None,
}

impl CatalogItem {
    /// Build a record from arbitrary JSON. Returns `None` for non-objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        Some(Self {
            set_number: get_int(obj, "set_number"),
            name: get_string(obj, "name"),
            theme: get_string(obj, "theme"),
            year: get_int(obj, "year"),
            pieces: get_int(obj, "pieces"),
            storage: get_string(obj, "storage"),
            storage_box: get_int(obj, "storage_box"),
            condition: get_string(obj, "condition"),
            image_url: get_string(obj, "image_url"),
            lego_web_url: get_string(obj, "lego_web_url"),
            manuals: get_list(obj, "manuals"),
            minifig_names: get_list(obj, "minifig_names"),
            minifigs_numbers: get_list(obj, "minifigs_numbers"),
            tags: get_list(obj, "tags"),
            created_at: get_string(obj, "created_at"),
            updated_at: get_string(obj, "updated_at"),
        })
    }

    /// Display name, with the same fallback the search view has always used
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Sin nombre")
    }

    /// Storage box, treating 0 as "not in a box"
    pub fn storage_box(&self) -> Option<i64> {
        self.storage_box.filter(|b| *b != 0)
    }

    /// Minifigures as aligned (name, code) pairs. Excess entries of a
    /// misaligned backend record are dropped.
    pub fn minifigs(&self) -> Vec<(&str, &str)> {
        self.minifig_names
            .iter()
            .zip(self.minifigs_numbers.iter())
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect()
    }

    pub fn image(&self) -> ImageRef {
        match self.image_url.as_deref() {
            Some(raw) => ImageRef::parse(raw),
            None => ImageRef::None,
        }
    }
}

impl ImageRef {
    /// Classify a raw image reference: data URI, bare base64, or URL
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return ImageRef::None;
        }

        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((meta, data)) = rest.split_once(',') {
                if let Some(mime) = meta.strip_suffix(";base64") {
                    if let Ok(bytes) = STANDARD.decode(data.trim()) {
                        return ImageRef::Inline {
                            mime: mime.to_string(),
                            bytes,
                        };
                    }
                }
            }
            return ImageRef::None;
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return ImageRef::Url(normalize_drive_link(raw));
        }

        // Some uploads store the bytes without a data URI prefix
        if let Ok(bytes) = STANDARD.decode(raw) {
            if let Some(mime) = sniff_mime(&bytes) {
                return ImageRef::Inline {
                    mime: mime.to_string(),
                    bytes,
                };
            }
        }
        ImageRef::Url(raw.to_string())
    }

    /// A `src` attribute value usable in HTML
    pub fn to_src(&self) -> Option<String> {
        match self {
            ImageRef::Url(url) => Some(url.clone()),
            ImageRef::Inline { mime, bytes } => {
                Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
            }
            ImageRef::None => None,
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn get_int(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn get_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn get_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => split_list(s),
        _ => Vec::new(),
    }
}

/// Split free text into list entries on commas or newlines
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full_record() {
        let item = CatalogItem::from_json(&json!({
            "set_number": 75192,
            "name": "Millennium Falcon",
            "theme": "Star Wars",
            "year": 2017,
            "pieces": 7541,
            "storage": "Trastero",
            "storage_box": 3,
            "condition": "Nuevo",
            "manuals": ["https://a/1.pdf", "https://a/2.pdf"],
            "minifig_names": ["Han Solo", "Chewbacca"],
            "minifigs_numbers": ["sw0001", "sw0002"],
        }))
        .unwrap();

        assert_eq!(item.set_number, Some(75192));
        assert_eq!(item.display_name(), "Millennium Falcon");
        assert_eq!(item.storage_box(), Some(3));
        assert_eq!(item.manuals.len(), 2);
        assert_eq!(
            item.minifigs(),
            vec![("Han Solo", "sw0001"), ("Chewbacca", "sw0002")]
        );
    }

    #[test]
    fn test_from_json_lenient_types() {
        let item = CatalogItem::from_json(&json!({
            "set_number": "10294",
            "year": "2021",
            "pieces": 9090.0,
            "storage_box": 0,
            "name": "",
            "tags": "barcos, ideas ,",
            "condition": null,
        }))
        .unwrap();

        assert_eq!(item.set_number, Some(10294));
        assert_eq!(item.year, Some(2021));
        assert_eq!(item.pieces, Some(9090));
        assert_eq!(item.storage_box(), None);
        assert_eq!(item.name, None);
        assert_eq!(item.display_name(), "Sin nombre");
        assert_eq!(item.condition, None);
        assert_eq!(item.tags, vec!["barcos", "ideas"]);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(CatalogItem::from_json(&json!("75192")).is_none());
        assert!(CatalogItem::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_minifigs_misaligned_are_truncated() {
        let item = CatalogItem {
            minifig_names: vec!["Luke".into(), "Leia".into(), "Yoda".into()],
            minifigs_numbers: vec!["sw1".into()],
            ..Default::default()
        };
        assert_eq!(item.minifigs(), vec![("Luke", "sw1")]);
    }

    #[test]
    fn test_image_ref_url_is_normalized() {
        let image = ImageRef::parse("https://drive.google.com/file/d/ABC123/view");
        assert_eq!(
            image,
            ImageRef::Url("https://drive.google.com/uc?export=view&id=ABC123".to_string())
        );
    }

    #[test]
    fn test_image_ref_data_uri() {
        let encoded = STANDARD.encode([0x89, b'P', b'N', b'G', 1, 2]);
        let image = ImageRef::parse(&format!("data:image/png;base64,{encoded}"));
        match image {
            ImageRef::Inline { mime, bytes } => {
                assert_eq!(mime, "image/png");
                assert_eq!(bytes.len(), 6);
            }
            other => panic!("expected inline image, got {other:?}"),
        }
    }

    #[test]
    fn test_image_ref_bare_base64_sniffs_mime() {
        let encoded = STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
        match ImageRef::parse(&encoded) {
            ImageRef::Inline { mime, .. } => assert_eq!(mime, "image/jpeg"),
            other => panic!("expected inline image, got {other:?}"),
        }
    }

    #[test]
    fn test_image_ref_plain_word_is_not_base64() {
        assert_eq!(ImageRef::parse("none"), ImageRef::Url("none".to_string()));
    }

    #[test]
    fn test_image_ref_empty() {
        assert_eq!(ImageRef::parse("   "), ImageRef::None);
        assert_eq!(CatalogItem::default().image(), ImageRef::None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b\nc,,"), vec!["a", "b", "c"]);
        assert!(split_list("  ").is_empty());
    }
}
