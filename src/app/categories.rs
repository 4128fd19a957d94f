use crate::constants::{ALL_CATEGORY_DESCRIPTION, ALL_CATEGORY_FONT, ALL_CATEGORY_NAME};
use crate::types::CategoryInfo;
use std::collections::BTreeMap;

/// Category listing for display: sorted by name (byte-wise), led by a
/// synthetic "All" category whose count is the sum of the others, with every
/// `id` set to the final position.
pub fn aggregate_categories(source: BTreeMap<String, CategoryInfo>) -> Vec<CategoryInfo> {
    let mut categories: Vec<CategoryInfo> = source.into_values().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    let total_count: usize = categories.iter().filter_map(|c| c.count).sum();

    let all = CategoryInfo {
        id: None,
        name: ALL_CATEGORY_NAME.to_string(),
        font: Some(ALL_CATEGORY_FONT.to_string()),
        description: Some(ALL_CATEGORY_DESCRIPTION.to_string()),
        count: Some(total_count),
    };

    std::iter::once(all)
        .chain(categories)
        .enumerate()
        .map(|(id, category)| CategoryInfo {
            id: Some(id),
            ..category
        })
        .collect()
}
