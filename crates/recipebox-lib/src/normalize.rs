//! Input normalization applied by the service before any write.

use std::collections::HashSet;

use crate::recipe::Step;

/// Trim and lowercase every tag, dropping later duplicates.
///
/// The first occurrence of each normalized tag wins and the relative order of
/// the survivors is preserved, so the function is idempotent.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Sort steps ascending by `order`. Stable for equal orders.
pub fn sort_steps(steps: &mut [Step]) {
    steps.sort_by_key(|step| step.order);
}

/// Returns true if two or more steps share an `order` value.
pub fn has_duplicate_step_orders(steps: &[Step]) -> bool {
    let orders: HashSet<i64> = steps.iter().map(|step| step.order).collect();
    orders.len() < steps.len()
}
