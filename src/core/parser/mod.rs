//! Input readers for transcripts and requirement catalogs

pub mod catalog_toml;
pub mod transcript_csv;

pub use catalog_toml::{load_catalog, parse_catalog_toml, DEFAULT_MIN_GRADE};
pub use transcript_csv::{parse_transcript_csv, parse_transcript_str, split_csv_line};
