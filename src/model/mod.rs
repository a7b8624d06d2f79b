//! In-memory catalog model: catalog → contexts → messages.
mod catalog;
mod context;
mod message;

pub use catalog::{
    Catalog,
    DEFAULT_TS_VERSION,
};
pub use context::Context;
pub use message::{
    Extra,
    Message,
    MessageKey,
    NumerusForm,
    Translation,
};
