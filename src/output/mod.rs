//! Catalog writers.
pub mod ts;

pub use ts::{
    LocationsMode,
    WriteOptions,
    save_catalog,
    write_catalog,
};
