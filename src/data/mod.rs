/// Data layer: table loading and the DEG filtering pipeline.
///
/// Architecture:
/// ```text
///   .tsv results table          gene list (.txt / pasted)
///        │                              │
///        ▼                              │
///   ┌──────────┐                        │
///   │  loader   │  parse TSV → ExpressionTable
///   └──────────┘                        │
///        │                              │
///        ▼                              │
///   ┌──────────┐                        │
///   │ resolver  │  headers → ComparisonBinding
///   └──────────┘                        │
///        │                              ▼
///   ┌──────────┐               ┌──────────────┐
///   │  genes    │ ◀──────────── │ GeneAllowList │  normalize + match
///   └──────────┘               └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  -log10(p) → p, apply thresholds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   rank    │  sort by |log2 FC| → all / up / down views
///   └──────────┘
/// ```
/// `pipeline` chains the stages for one run.

pub mod filter;
pub mod genes;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod resolver;
