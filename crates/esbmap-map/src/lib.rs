//! Map document construction for the ESB / Scraper / Match overlay.
//!
//! [`build`] always returns a displayable [`MapDocument`]: records that
//! cannot be drawn are skipped one by one, and a document that cannot be
//! built at all degrades to [`MapDocument::fallback`].

pub mod builder;
pub mod center;
pub mod document;
pub mod error;
mod popup;
pub mod render;

pub use builder::{build, try_build};
pub use center::{center_of, FALLBACK_CENTER};
pub use document::{
    CircleMarker, Element, Layer, LayerKind, MapDocument, Polyline, Popup, Style, TileLayer,
};
pub use error::MapError;
pub use render::render_html;
