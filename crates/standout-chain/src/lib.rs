//! Chain - lazy chaining of ordered sources.
//!
//! A [`Chain`] presents several independent sources as one logical sequence
//! without materializing any of them. It supports:
//!
//! - Element filtering with a per-chain predicate
//! - Just-in-time transformation of the elements actually yielded
//! - Sorted traversal: a lazy k-way merge of presorted sources
//! - Lazy slicing and indexing over the filtered, ordered sequence
//! - Collective operations (`count`, `exists`, `filter`, `exclude`,
//!   `order_by`, `none`) that push down to each source when it can take
//!   them and quietly keep the source as is when it cannot
//!
//! # Quick Start
//!
//! ```rust
//! use standout_chain::Chain;
//!
//! let chain = Chain::new()
//!     .source(vec![1, 2, 3])
//!     .source(vec![4, 5]);
//!
//! assert_eq!(chain.count(), 5);
//!
//! let middle = chain.slice(Some(1), Some(4), None).unwrap();
//! assert_eq!(middle.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
//!
//! let doubled = chain.with_transform(|n| n * 2);
//! assert_eq!(doubled.get(4).unwrap(), 10);
//! ```
//!
//! # Sources and Pushdown
//!
//! Anything implementing [`Source`] can feed a chain. Beyond producing its
//! elements a source may report its size and accept `filter`, `exclude` and
//! `order_by`. [`Records`] does all of these for in-memory data with
//! [`FieldAccess`]:
//!
//! ```rust
//! use standout_chain::{Chain, FieldAccess, Filter, Number, Records, Value};
//!
//! #[derive(Clone)]
//! struct Task {
//!     name: &'static str,
//!     priority: i64,
//! }
//!
//! impl FieldAccess for Task {
//!     fn field_names() -> &'static [&'static str] {
//!         &["name", "priority"]
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(self.name),
//!             "priority" => Value::Number(Number::I64(self.priority)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let chain = Chain::new()
//!     .source(Records::new(vec![
//!         Task { name: "docs", priority: 1 },
//!         Task { name: "bug", priority: 5 },
//!     ]))
//!     .source(Records::new(vec![Task { name: "release", priority: 3 }]));
//!
//! let urgent = chain
//!     .filter(&Filter::new().and("priority__gte", 3))
//!     .order_by(["-priority"]);
//!
//! let names: Vec<_> = urgent.iter().map(|t| t.name).collect();
//! assert_eq!(names, vec!["bug", "release"]);
//! ```
//!
//! A source that cannot take an operation is kept unchanged. Pushdown is an
//! optimization, not a guarantee: use [`Chain::with_predicate`] when every
//! element must satisfy a condition regardless of the sources.
//!
//! # Ordering
//!
//! With a key extractor installed ([`Chain::with_key`] or
//! [`Chain::order_by`]) the chain merges its sources instead of
//! concatenating them. Each source must already be sorted by the same key;
//! the merge never sorts. Equal keys are emitted in source registration
//! order.

mod bounds;
mod chain;
mod error;
mod hooks;
mod iter;
mod lookup;
mod op;
mod ordering;
mod source;
mod value;

// Re-export public API
pub use bounds::Bounds;
pub use chain::Chain;
pub use error::{ChainError, ErrorKind, Result, Unsupported};
pub use hooks::{KeyExtractor, Predicate, Transform};
pub use iter::Iter;
pub use lookup::{Filter, Lookup, Operand};
pub use op::Op;
pub use ordering::{compare_values, total_order, Dir, Key, OrderBy};
pub use source::{Once, Pushed, Records, Source, SourceRef};
pub use value::{FieldAccess, Number, Scalar, Timestamp, Value};
