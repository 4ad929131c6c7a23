//! Feeding external data through a [`Loader`](crate::Loader).

pub mod csv;

pub use self::csv::{import_csv, import_reader};
