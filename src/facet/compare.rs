use std::cmp::Ordering;

use super::key::Key;

/// Total order over facet keys, used to sort one axis' buckets.
pub type Comparator = fn(&Key, &Key) -> Ordering;

/// Horizontal axes read left to right: missing data first, then numbers
/// ascending (`NaN` leading), then strings in ascending locale order.
pub fn horizontal_string_compare(a: &Key, b: &Key) -> Ordering {
    if let Some(ord) = compare_absent(a, b) {
        return ord;
    }
    match (a, b) {
        (Key::Number(x), Key::Number(y)) => compare_numbers(*x, *y, false),
        (Key::Number(_), Key::String(_)) => Ordering::Less,
        (Key::String(_), Key::Number(_)) => Ordering::Greater,
        (Key::String(x), Key::String(y)) => locale_compare(x, y),
        _ => unreachable!("absent keys handled above"),
    }
}

/// Vertical axes are stored top to bottom but displayed bottom to top, so
/// numbers and strings sort descending. Missing data and `NaN` still lead.
pub fn vertical_string_compare(a: &Key, b: &Key) -> Ordering {
    if let Some(ord) = compare_absent(a, b) {
        return ord;
    }
    match (a, b) {
        (Key::Number(x), Key::Number(y)) => compare_numbers(*x, *y, true),
        (Key::Number(_), Key::String(_)) => Ordering::Less,
        (Key::String(_), Key::Number(_)) => Ordering::Greater,
        (Key::String(x), Key::String(y)) => locale_compare(y, x),
        _ => unreachable!("absent keys handled above"),
    }
}

/// Numeric axes: missing data first, then strings (ascending locale order),
/// then numbers ascending with `NaN` leading the numbers.
pub fn number_compare(a: &Key, b: &Key) -> Ordering {
    if let Some(ord) = compare_absent(a, b) {
        return ord;
    }
    match (a, b) {
        (Key::Number(x), Key::Number(y)) => compare_numbers(*x, *y, false),
        (Key::Number(_), Key::String(_)) => Ordering::Greater,
        (Key::String(_), Key::Number(_)) => Ordering::Less,
        (Key::String(x), Key::String(y)) => locale_compare(x, y),
        _ => unreachable!("absent keys handled above"),
    }
}

/// `Undefined < Null < anything present`. Returns `None` when both keys are present.
fn compare_absent(a: &Key, b: &Key) -> Option<Ordering> {
    fn rank(key: &Key) -> u8 {
        match key {
            Key::Undefined => 0,
            Key::Null => 1,
            Key::Number(_) | Key::String(_) => 2,
        }
    }
    let (ra, rb) = (rank(a), rank(b));
    if ra == 2 && rb == 2 {
        None
    } else {
        Some(ra.cmp(&rb))
    }
}

fn compare_numbers(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            // Finite and infinite values are totally ordered here; -0.0 == 0.0.
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Locale-style string order: case-insensitive first, then lowercase before
/// uppercase at the first differing position, then code point order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.len().cmp(&b.len())
}
