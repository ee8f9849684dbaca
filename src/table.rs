use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Rows matching `pred`, in source order.
pub fn filter<'a, T, P>(rows: &'a [T], mut pred: P) -> Vec<&'a T>
where
    P: FnMut(&T) -> bool,
{
    rows.iter().filter(|row| pred(row)).collect()
}

/// Groups rows by key and folds each group into an accumulator.
///
/// Groups come back in ascending key order. Rows are folded in source order.
pub fn group_by<'a, T, K, A, I>(
    rows: I,
    key: impl Fn(&T) -> K,
    init: impl Fn() -> A,
    fold: impl Fn(&mut A, &T),
) -> Vec<(K, A)>
where
    T: 'a,
    K: Ord,
    I: IntoIterator<Item = &'a T>,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry(key(row)).or_insert_with(&init);
        fold(acc, row);
    }
    groups.into_iter().collect()
}

/// Stable descending sort. Equal keys keep their incoming order.
pub fn sort_desc_by<T, K, F>(items: &mut [T], key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(Ordering::Equal)
    });
}

/// Distinct keys in first-appearance order.
pub fn distinct<T, K, F>(rows: &[T], key: F) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let k = key(row);
        if seen.insert(k.clone()) {
            out.push(k);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    /// NaN values are skipped.
    pub fn push(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.sum += value;
        self.count += 1;
    }

    /// NaN for an empty group or one holding only NaN.
    pub fn value(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.sum / self.count as f64
    }
}
