//! Catalog request/response shaping
//!
//! Pure functions only, no I/O:
//! - `model`: the record type and lenient JSON parsing
//! - `links`: share-link normalization
//! - `payload`: request bodies for the search, listing and admin endpoints
//! - `envelope`: response unpacking, including double-encoded bodies
//! - `render`: display cards
//! - `html`: HTML card/table/gallery export

pub mod envelope;
pub mod html;
pub mod links;
pub mod model;
pub mod payload;
pub mod render;

pub use envelope::{SearchResponse, unpack_envelope};
pub use links::normalize_drive_link;
pub use model::{CatalogItem, ImageRef};
pub use payload::{AdminAction, FormField, ItemForm, PayloadError, build_admin_payload};
pub use render::ItemCard;
