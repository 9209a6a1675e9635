use crate::layout::Padding;

/// Shrink left/right padding so at least `min_content` of `available` width
/// is left for content.
///
/// Padding is untouched while it fits. Otherwise both sides give up space in
/// proportion to their original sizes, and once `min_content` alone fills
/// `available` both sides drop to zero.
pub fn reduce_horizontal_padding(available: f64, min_content: f64, padding: Padding) -> Padding {
    let (left, right) = reduce_pair(available, min_content, padding.left, padding.right);
    Padding {
        left,
        right,
        ..padding
    }
}

/// Vertical counterpart of [`reduce_horizontal_padding`] (top/bottom).
pub fn reduce_vertical_padding(available: f64, min_content: f64, padding: Padding) -> Padding {
    let (top, bottom) = reduce_pair(available, min_content, padding.top, padding.bottom);
    Padding {
        top,
        bottom,
        ..padding
    }
}

fn reduce_pair(available: f64, min_content: f64, first: f64, second: f64) -> (f64, f64) {
    let total = first + second;
    if total <= 0.0 || available - total >= min_content {
        return (first, second);
    }
    if min_content >= available {
        return (0.0, 0.0);
    }
    let scale = (available - min_content) / total;
    (first * scale, second * scale)
}
