//! Data layer: core types, loading, preparation and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  prepare  │  dates, bubble size, month key, top developers
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────────┐
//!   │ PreparedDataset  │  immutable Vec<GameRecord>, class index
//!   └─────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  publisher-class selection → subset
//!   └──────────┘
//! ```

pub mod error;
pub mod field;
pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;
