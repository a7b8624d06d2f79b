//! ts-catalog
//!
//! Qt Linguist (`.ts`) 翻訳カタログの読み込み・マージ・書き出しを行うエンジン

pub mod config;
pub mod error;
pub mod input;
pub mod merge;
pub mod model;
pub mod output;
pub mod plural;
pub mod stats;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod test_utils;

pub use error::{
    CatalogError,
    DuplicateMessageError,
    MalformedCatalogError,
    UnsupportedLanguageError,
    UnwritableAttributeError,
};
pub use input::{
    ExtractedMessage,
    load_catalog,
    parse_catalog,
};
pub use merge::{
    MergeOptions,
    MergeOutcome,
    merge,
};
pub use model::{
    Catalog,
    Context,
    Message,
    Translation,
};
pub use output::{
    WriteOptions,
    save_catalog,
    write_catalog,
};
pub use plural::PluralRules;
pub use stats::CatalogStats;
