/// Data layer: document model, loading, and the three transformations.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → DatasetDocument
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ DatasetDocument  │  rows, result_map, column_names
///   └─────────────────┘
///        │
///        ├──► normalize   divide by global max
///        ├──► filter      project onto selected classes / attributes
///        └──► shuffle     permute rows
///        │
///        ▼
///   loader::write_document  → compact .json
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod sample;
pub mod shuffle;
