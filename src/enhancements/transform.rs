//! Pure face-value transformations
//!
//! Every function takes a face-value slice and returns a new vector of the
//! same length. Empty input comes back empty. Where a rule picks "the first"
//! face, ties resolve by lowest index, which players can see as the physical
//! face that changed.

/// Every face becomes the ceiling of the mean
pub fn flatten_to_mean(values: &[u32]) -> Vec<u32> {
    if values.is_empty() {
        return Vec::new();
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    let len = values.len() as u64;
    let mean = sum.div_ceil(len) as u32;
    vec![mean; values.len()]
}

pub fn add_uniform(values: &[u32], amount: u32) -> Vec<u32> {
    values.iter().map(|&v| v.saturating_add(amount)).collect()
}

/// Scale every face, flooring, never below 1
pub fn multiply_uniform(values: &[u32], factor: f64) -> Vec<u32> {
    values
        .iter()
        .map(|&v| ((v as f64 * factor).floor() as u32).max(1))
        .collect()
}

/// Every face showing the current maximum is doubled
pub fn double_max(values: &[u32]) -> Vec<u32> {
    let Some(&max) = values.iter().max() else {
        return Vec::new();
    };
    values
        .iter()
        .map(|&v| if v == max { v.saturating_mul(2) } else { v })
        .collect()
}

/// Faces below `floor` are raised to it
pub fn raise_to_floor(values: &[u32], floor: u32) -> Vec<u32> {
    values.iter().map(|&v| v.max(floor)).collect()
}

/// Low faces gain a bonus, high faces pay a penalty, the middle is untouched
pub fn threshold_adjust(values: &[u32], low: u32, high: u32, bonus: u32, penalty: u32) -> Vec<u32> {
    values
        .iter()
        .map(|&v| {
            if v < low {
                v.saturating_add(bonus)
            } else if v > high {
                v.saturating_sub(penalty)
            } else {
                v
            }
        })
        .collect()
}

/// Lower half forced to `low_value`, upper half gains `high_bonus`
///
/// Ranking is a stable sort on value, so equal values rank by index.
/// With an odd face count the extra face lands in the upper half.
pub fn polarize(values: &[u32], low_value: u32, high_bonus: u32) -> Vec<u32> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| values[i]);

    let low_count = values.len() / 2;
    let mut result = values.to_vec();
    for (rank, &idx) in order.iter().enumerate() {
        result[idx] = if rank < low_count {
            low_value
        } else {
            values[idx].saturating_add(high_bonus)
        };
    }
    result
}

/// First maximum doubled, first minimum zeroed
///
/// The minimum is searched among the other faces so two different faces
/// change. A single-face die is doubled then zeroed.
pub fn specialize(values: &[u32]) -> Vec<u32> {
    let Some(max_idx) = first_index_of_max(values) else {
        return Vec::new();
    };
    let min_idx = (0..values.len())
        .filter(|&i| i != max_idx || values.len() == 1)
        .min_by_key(|&i| (values[i], i))
        .unwrap_or(max_idx);

    let mut result = values.to_vec();
    result[max_idx] = result[max_idx].saturating_mul(2);
    result[min_idx] = 0;
    result
}

/// Ceiling half of every face
pub fn halve_ceil(values: &[u32]) -> Vec<u32> {
    values.iter().map(|&v| v.div_ceil(2)).collect()
}

fn first_index_of_max(values: &[u32]) -> Option<usize> {
    let max = *values.iter().max()?;
    values.iter().position(|&v| v == max)
}
