//! End-to-end behavior of chains over mixed sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use standout_chain::{
    Chain, ChainError, ErrorKind, FieldAccess, Filter, Number, Once, OrderBy, Pushed, Records,
    Source, Unsupported, Value,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: &'static str,
    score: i64,
}

impl FieldAccess for Entry {
    fn field_names() -> &'static [&'static str] {
        &["name", "score"]
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "name" => Value::String(self.name),
            "score" => Value::Number(Number::I64(self.score)),
            _ => Value::None,
        }
    }
}

fn entry(name: &'static str, score: i64) -> Entry {
    Entry { name, score }
}

fn names(chain: &Chain<Entry>) -> Vec<&'static str> {
    chain.iter().map(|e| e.name).collect()
}

/// Counts how many elements have been pulled out of it.
struct Metered {
    items: Vec<i32>,
    pulled: Arc<AtomicUsize>,
}

impl Source<i32> for Metered {
    fn name(&self) -> &'static str {
        "metered"
    }

    fn elements(&self) -> Box<dyn Iterator<Item = i32> + '_> {
        let pulled = Arc::clone(&self.pulled);
        Box::new(self.items.iter().map(move |n| {
            pulled.fetch_add(1, Ordering::SeqCst);
            *n
        }))
    }
}

/// Accepts filters but refuses to reorder.
struct FilterOnly(Records<Entry>);

impl Source<Entry> for FilterOnly {
    fn elements(&self) -> Box<dyn Iterator<Item = Entry> + '_> {
        self.0.elements()
    }

    fn filter(&self, filter: &Filter) -> Pushed<Entry> {
        self.0.filter(filter)
    }
}

/// Reports a stored total that differs from what it yields.
struct Tallied {
    total: usize,
}

impl Source<i32> for Tallied {
    fn elements(&self) -> Box<dyn Iterator<Item = i32> + '_> {
        Box::new(std::iter::empty())
    }

    fn count(&self) -> Option<usize> {
        Some(self.total)
    }

    fn length(&self) -> Option<usize> {
        Some(0)
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn merge_two_sorted_lists() {
    let chain = Chain::new()
        .source(vec![1, 3, 5])
        .source(vec![2, 4, 6])
        .with_key(|n: &i32| *n);
    assert_eq!(chain.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn count_and_slice_over_concatenation() {
    let chain: Chain<i32> = [vec![1, 2, 3], vec![4, 5]].into_iter().collect();
    assert_eq!(chain.count(), 5);

    let sliced = chain.slice(Some(1), Some(4), None).unwrap();
    assert_eq!(sliced.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn order_by_descending_score() {
    let chain = Chain::new().source(Records::new(vec![
        entry("a", 3),
        entry("b", 1),
        entry("c", 2),
    ]));
    let ordered = chain.order_by(["-score"]);
    let scores: Vec<i64> = ordered.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![3, 2, 1]);
}

#[test]
fn order_by_merges_across_record_sets() {
    let chain = Chain::new()
        .source(Records::new(vec![entry("a", 5), entry("b", 1)]))
        .source(Records::new(vec![entry("c", 2), entry("d", 9)]));

    let ascending = chain.order_by([OrderBy::asc("score")]);
    assert_eq!(names(&ascending), vec!["b", "c", "a", "d"]);

    let descending = chain.order_by(["-score"]);
    assert_eq!(names(&descending), vec!["d", "a", "c", "b"]);
}

#[test]
fn order_by_by_name_then_score() {
    let chain = Chain::new().source(Records::new(vec![
        entry("b", 1),
        entry("a", 2),
        entry("a", 7),
    ]));
    let ordered = chain.order_by(["name", "-score"]);
    let pairs: Vec<_> = ordered.iter().map(|e| (e.name, e.score)).collect();
    assert_eq!(pairs, vec![("a", 7), ("a", 2), ("b", 1)]);
}

#[derive(Debug, Clone)]
enum Reading {
    Number(f64),
    Text(&'static str),
    Missing,
}

#[derive(Debug, Clone)]
struct Sample {
    label: &'static str,
    reading: Reading,
}

impl FieldAccess for Sample {
    fn field_names() -> &'static [&'static str] {
        &["label", "reading"]
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match (field, &self.reading) {
            ("label", _) => Value::String(self.label),
            ("reading", Reading::Number(n)) => Value::Number(Number::F64(*n)),
            ("reading", Reading::Text(t)) => Value::String(t),
            _ => Value::None,
        }
    }
}

fn sample(label: &'static str, reading: Reading) -> Sample {
    Sample { label, reading }
}

#[test]
fn order_by_puts_nan_after_numbers() {
    let chain = Chain::new().source(Records::new(vec![
        sample("three", Reading::Number(3.0)),
        sample("nan", Reading::Number(f64::NAN)),
        sample("one", Reading::Number(1.0)),
        sample("two", Reading::Number(2.0)),
    ]));
    let labels: Vec<_> = chain.order_by(["reading"]).iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["one", "two", "three", "nan"]);
}

#[test]
fn order_by_ranks_mixed_types() {
    let chain = Chain::new().source(Records::new(vec![
        sample("b", Reading::Text("b")),
        sample("2", Reading::Number(2.0)),
        sample("missing", Reading::Missing),
        sample("nan", Reading::Number(f64::NAN)),
        sample("a", Reading::Text("a")),
        sample("1", Reading::Number(1.0)),
    ]));

    let ascending: Vec<_> = chain.order_by(["reading"]).iter().map(|s| s.label).collect();
    assert_eq!(ascending, vec!["1", "2", "nan", "a", "b", "missing"]);

    let descending: Vec<_> = chain.order_by(["-reading"]).iter().map(|s| s.label).collect();
    assert_eq!(descending, vec!["missing", "b", "a", "nan", "2", "1"]);
}

#[test]
fn order_by_many_rows_with_nan_is_sorted() {
    // Enough rows to reach the non-trivial sort paths.
    let mut state = 0x2545_f491_u32;
    let rows: Vec<Sample> = (0..64)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let reading = if state % 5 == 0 {
                Reading::Number(f64::NAN)
            } else {
                Reading::Number(f64::from(state % 1000))
            };
            sample("row", reading)
        })
        .collect();

    let split = rows.len() / 2;
    let chain = Chain::new()
        .source(Records::new(rows[..split].to_vec()))
        .source(Records::new(rows[split..].to_vec()));
    let ordered = chain.order_by(["reading"]);
    assert_eq!(ordered.count(), 64);

    let values: Vec<f64> = ordered
        .iter()
        .map(|s| match s.reading {
            Reading::Number(n) => n,
            _ => 0.0,
        })
        .collect();
    let nans = values.iter().filter(|v| v.is_nan()).count();
    assert!(nans > 0);
    assert!(values[64 - nans..].iter().all(|v| v.is_nan()));
    assert!(values[..64 - nans].windows(2).all(|w| w[0] <= w[1]));
}

// ============================================================================
// Pushdown fallback
// ============================================================================

#[test]
fn order_by_keeps_sources_that_decline() {
    // The second source cannot sort, but is already in descending order.
    let chain = Chain::new()
        .source(Records::new(vec![entry("a", 1), entry("b", 8)]))
        .source(FilterOnly(Records::new(vec![entry("c", 6), entry("d", 2)])));

    let ordered = chain.order_by(["-score"]);
    assert!(Arc::ptr_eq(&ordered.sources()[1], &chain.sources()[1]));
    assert_eq!(names(&ordered), vec!["b", "c", "d", "a"]);
}

#[test]
fn filter_pushes_where_supported() {
    let plain = vec![entry("p", 0), entry("q", 10)];
    let chain = Chain::new()
        .source(Records::new(vec![entry("a", 1), entry("b", 8)]))
        .source(FilterOnly(Records::new(vec![entry("c", 6), entry("d", 2)])))
        .source(plain);

    let filtered = chain.filter(&Filter::new().and("score__gte", 5));
    assert_eq!(names(&filtered), vec!["b", "c", "p", "q"]);

    let excluded = chain.exclude(&Filter::new().and("name__in", vec!["a", "q"]));
    assert_eq!(names(&excluded), vec!["b", "c", "d", "p", "q"]);
}

#[test]
fn filter_on_unknown_field_keeps_everything() {
    let chain = Chain::new().source(Records::new(vec![entry("a", 1), entry("b", 2)]));
    let filtered = chain.filter(&Filter::new().and("rank__gt", 1));
    assert_eq!(names(&filtered), vec!["a", "b"]);
    assert!(Arc::ptr_eq(&filtered.sources()[0], &chain.sources()[0]));
}

#[test]
fn predicate_still_applies_after_fallback() {
    let chain = Chain::new()
        .source(vec![entry("a", 1), entry("b", 8), entry("c", 3)])
        .with_predicate(|e: &Entry| e.score > 2);
    let filtered = chain.filter(&Filter::new().and("score__lt", 5));
    assert_eq!(names(&filtered), vec!["b", "c"]);
}

#[test]
fn regex_filter_requires_compiled_pattern() {
    let chain = Chain::new().source(Records::new(vec![entry("alpha", 1), entry("beta", 2)]));

    let compiled = Filter::new().and_regex("name", "^a").unwrap();
    assert_eq!(names(&chain.filter(&compiled)), vec!["alpha"]);

    let raw = Filter::new().and("name__regex", "^a");
    assert!(matches!(
        chain.sources()[0].filter(&raw).err(),
        Some(Unsupported::InvalidArgument(_))
    ));
    assert_eq!(names(&chain.filter(&raw)), vec!["alpha", "beta"]);

    assert!(matches!(
        Filter::new().and_regex("name", "("),
        Err(ChainError::InvalidRegex(_))
    ));
}

// ============================================================================
// Laziness
// ============================================================================

#[test]
fn slicing_stops_pulling_at_stop() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let chain = Chain::new().source(Metered {
        items: (0..100).collect(),
        pulled: Arc::clone(&pulled),
    });

    let head = chain.slice(None, Some(3), None).unwrap();
    assert_eq!(head.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(pulled.load(Ordering::SeqCst), 3);
}

#[test]
fn merge_pulls_one_candidate_per_source() {
    let left = Arc::new(AtomicUsize::new(0));
    let right = Arc::new(AtomicUsize::new(0));
    let chain = Chain::new()
        .source(Metered {
            items: vec![1, 3, 5, 7],
            pulled: Arc::clone(&left),
        })
        .source(Metered {
            items: vec![2, 4, 6, 8],
            pulled: Arc::clone(&right),
        })
        .with_key(|n: &i32| *n);

    let mut iter = chain.iter();
    assert_eq!(iter.next(), Some(1));
    assert_eq!(left.load(Ordering::SeqCst), 1);
    assert_eq!(right.load(Ordering::SeqCst), 1);

    assert_eq!(iter.next(), Some(2));
    assert_eq!(left.load(Ordering::SeqCst), 2);
    assert_eq!(right.load(Ordering::SeqCst), 1);
}

#[test]
fn count_prefers_source_totals() {
    let chain = Chain::new().source(Tallied { total: 42 }).source(vec![1, 2]);
    assert_eq!(chain.count(), 44);
    assert!(chain.exists());

    // With a predicate the chain walks instead.
    let walked = chain.with_predicate(|_: &i32| true);
    assert_eq!(walked.count(), 2);
}

#[test]
fn once_sources_are_drained_by_traversal_and_never_sorted() {
    let chain = Chain::new()
        .source(Once::new(vec![3, 1]))
        .source(vec![2])
        .with_key(|n: &i32| *n);
    assert_eq!(chain.iter().collect::<Vec<_>>(), vec![2, 3, 1]);
    assert_eq!(chain.iter().collect::<Vec<_>>(), vec![2]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn error_kinds() {
    let chain = Chain::new().source(vec![1, 2, 3]);

    let zero = chain.slice(None, None, Some(0)).unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::Value);
    assert!(matches!(zero, ChainError::ZeroStep));

    let past = chain.get(3).unwrap_err();
    assert_eq!(past.kind(), ErrorKind::Index);

    let sliced = chain.slice(Some(1), None, None).unwrap();
    assert_eq!(sliced.get(1).unwrap(), 3);
    assert_eq!(sliced.get(2).unwrap_err().kind(), ErrorKind::Index);
}

#[test]
fn transform_changes_output_type() {
    let chain = Chain::new()
        .source(Records::new(vec![entry("a", 2), entry("b", 1)]))
        .order_by(["score"])
        .with_transform(|e: Entry| format!("{}={}", e.name, e.score));
    assert_eq!(
        chain.iter().collect::<Vec<_>>(),
        vec!["b=1".to_string(), "a=2".to_string()]
    );
    assert_eq!(chain.get(1).unwrap(), "a=2");
}
