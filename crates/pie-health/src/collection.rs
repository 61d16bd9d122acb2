//! Sorting and extremum helpers for table rows.
//!
//! [`order_by`] sorts by any number of keys, each one either a named field
//! or a derivation closure, with its own direction. Keys are resolved once
//! per element before sorting and the sort is stable, so rows that compare
//! equal keep their input order between refreshes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::HealthError;
use crate::types::ModelAvailabilityRow;

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(HealthError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// A comparable key extracted from a row.
///
/// Values of different kinds order as `Null < Bool < Number < Text`.
#[derive(Debug, Clone)]
pub enum SortValue {
    /// Missing or null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value, compared with [`f64::total_cmp`].
    Number(f64),
    /// Text value, compared lexically.
    Text(String),
}

impl SortValue {
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Convert a JSON value; arrays and objects compare by their JSON text.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl From<bool> for SortValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for SortValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for SortValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for SortValue {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for SortValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SortValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Named field lookup used by [`SortKey::Field`].
pub trait Fields {
    /// Value of the field called `name`, or `None` if there is no such field.
    fn field(&self, name: &str) -> Option<SortValue>;
}

impl Fields for Value {
    fn field(&self, name: &str) -> Option<SortValue> {
        self.as_object()?.get(name).map(SortValue::from_json)
    }
}

impl Fields for ModelAvailabilityRow {
    fn field(&self, name: &str) -> Option<SortValue> {
        let value: SortValue = match name {
            "model" => self.model.as_str().into(),
            "provider" => self.provider.as_str().into(),
            "type" => self.model_type.as_str().into(),
            "avgCost" => self.avg_cost.clone().into(),
            "inputCost" => self.input_cost.clone().into(),
            "outputCost" => self.output_cost.clone().into(),
            "maxTokens" => self.max_tokens.into(),
            "maxResponseTokens" => self.max_response_tokens.into(),
            "isExpanded" => self.is_expanded.into(),
            "totalTracked" => self.total_tracked.into(),
            "upTime" => self.up_time.into(),
            "upTimePercentage" => self.up_time_percentage.into(),
            // Observation time in unix milliseconds
            "lastStatus" | "lastStatus.dt" => {
                self.last_status.as_ref().map(|s| s.dt.timestamp_millis()).into()
            }
            "lastStatus.status" => self.last_status.as_ref().map(|s| s.status.clone()).into(),
            _ => return None,
        };
        Some(value)
    }
}

/// How to extract one sort key from an element.
pub enum SortKey<T> {
    /// Look the key up by field name.
    Field(String),
    /// Compute the key from the element.
    Derived(Box<dyn Fn(&T) -> SortValue>),
}

impl<T> SortKey<T> {
    /// Key on a named field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Key on a computed value.
    pub fn derived<F, V>(f: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: Into<SortValue>,
    {
        Self::Derived(Box::new(move |item| f(item).into()))
    }
}

impl<T: Fields> SortKey<T> {
    /// Resolve the key for one element. Unknown fields resolve to `Null`.
    pub fn resolve(&self, item: &T) -> SortValue {
        match self {
            Self::Field(name) => item.field(name).unwrap_or(SortValue::Null),
            Self::Derived(f) => f(item),
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Return a sorted copy of `collection`.
///
/// Key `i` is sorted in `orders[i]`; when fewer orders than keys are given
/// the last order repeats, and with no orders every key is ascending. Later
/// keys only break ties on earlier ones. The sort is stable.
pub fn order_by<T: Fields + Clone>(
    collection: &[T],
    keys: &[SortKey<T>],
    orders: &[SortOrder],
) -> Vec<T> {
    let directions: Vec<SortOrder> = (0..keys.len())
        .map(|i| orders.get(i).or(orders.last()).copied().unwrap_or_default())
        .collect();

    let mut decorated: Vec<(Vec<SortValue>, &T)> = collection
        .iter()
        .map(|item| (keys.iter().map(|k| k.resolve(item)).collect(), item))
        .collect();

    decorated.sort_by(|(a, _), (b, _)| {
        a.iter()
            .zip(b)
            .zip(&directions)
            .map(|((va, vb), dir)| dir.apply(va.cmp(vb)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    decorated.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Single-key form of [`order_by`].
pub fn order_by_key<T: Fields + Clone>(collection: &[T], key: SortKey<T>, order: SortOrder) -> Vec<T> {
    order_by(collection, &[key], &[order])
}

/// Smallest element, keeping the earliest on ties; `None` when empty.
pub fn min<T: PartialOrd>(items: &[T]) -> Option<&T> {
    items.iter().reduce(|m, v| if v < m { v } else { m })
}

/// Largest element, keeping the earliest on ties; `None` when empty.
pub fn max<T: PartialOrd>(items: &[T]) -> Option<&T> {
    items.iter().reduce(|m, v| if v > m { v } else { m })
}

/// Entries of a JSON object in its iteration order; empty for non-objects.
#[must_use]
pub fn to_pairs(value: &Value) -> Vec<(String, Value)> {
    value
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}
