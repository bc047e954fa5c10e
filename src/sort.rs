//! Sort Engine - stable multi-key ordering of loop items
//!
//! Each key resolves both items through the path resolver; the first key
//! whose values differ decides, full ties keep source order.
//!
//! Raw comparison of two resolved values:
//! - absent vs absent: equal; absent vs present: absent is greater
//! - two RFC 3339 timestamps: by instant
//! - two strings: lexicographic
//! - two numbers: numeric
//! - anything else: by string form
//!
//! The direction flip is applied after the raw comparison, so absent values
//! land last when ascending and first when descending.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::ast::SortKey;
use crate::jsonpath;

/// Sort `items` in place by `keys`
pub fn sort_items(items: &mut Vec<Value>, keys: &[SortKey]) {
    if keys.is_empty() || items.len() < 2 {
        return;
    }
    let taken = std::mem::take(items);
    *items = merge_sort(taken, &mut |a: &Value, b: &Value| compare_items(a, b, keys));
}

/// Sorted copy of `items`
pub fn sorted(mut items: Vec<Value>, keys: &[SortKey]) -> Vec<Value> {
    sort_items(&mut items, keys);
    items
}

/// Lexicographic comparison of two items over `keys`
pub fn compare_items(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = compare_values(jsonpath::lookup(a, &key.path), jsonpath::lookup(b, &key.path));
        if ord != Ordering::Equal {
            return if key.ascending { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

/// Raw (ascending) comparison of two resolved values
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Value::String(sa), Value::String(sb)) => match (parse_instant(sa), parse_instant(sb)) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            _ => sa.cmp(sb),
        },
        (Value::Number(na), Value::Number(nb)) => {
            if let (Some(ia), Some(ib)) = (na.as_i64(), nb.as_i64()) {
                return ia.cmp(&ib);
            }
            let fa = na.as_f64().unwrap_or(f64::NAN);
            let fb = nb.as_f64().unwrap_or(f64::NAN);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        _ => jsonpath::stringify(a).cmp(&jsonpath::stringify(b)),
    }
}

fn parse_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

/// Stable top-down merge sort
///
/// Mixed-type comparisons are not transitive, which `slice::sort_by` may
/// reject with a panic; merging only ever asks "is right strictly less".
fn merge_sort<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        out.extend(if take_right { right.next() } else { left.next() });
    }

    out
}
