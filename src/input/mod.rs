//! Catalog and extraction list readers.
pub mod extraction;
pub mod ts;

pub use extraction::{
    ExtractedMessage,
    load_extraction,
    parse_extraction,
};
pub use ts::{
    detect_language_from_path,
    load_catalog,
    parse_catalog,
};
