use indexmap::IndexMap;
use std::hash::Hash;

use crate::dataset::{ClassKey, Record};
use crate::error::{Result, StatsError};

/// Records partitioned by `Alcohol` class, classes in first-seen order.
pub type GroupedDataset = IndexMap<ClassKey, Vec<Record>>;

/// Partitions `items` by the key `key_fn` derives from each item.
///
/// Buckets are created in first-encounter order of their keys and keep the
/// input order of their items. `key_fn` also receives the item's position so
/// errors can name the offending item.
pub fn group_by<T, K, F>(items: &[T], mut key_fn: F) -> Result<IndexMap<K, Vec<T>>>
where
    T: Clone,
    K: Hash + Eq,
    F: FnMut(usize, &T) -> Result<K>,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();

    for (index, item) in items.iter().enumerate() {
        let key = key_fn(index, item)?;
        groups.entry(key).or_default().push(item.clone());
    }

    Ok(groups)
}

/// Groups records by their `Alcohol` class. A record without a class is an error.
pub fn group_by_class(records: &[Record]) -> Result<GroupedDataset> {
    group_by(records, |index, record| {
        record.alcohol.ok_or_else(|| {
            StatsError::MissingField { field: "Alcohol" }.at_record(index)
        })
    })
}
