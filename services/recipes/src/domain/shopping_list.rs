//! Shopping list aggregation.
//!
//! Lines from every recipe in a user's cart are merged by exact
//! `(ingredient name, measurement unit)` and their amounts summed. The same
//! ingredient in two different units stays as two rows.

use std::collections::BTreeMap;

use crate::domain::types::{IngredientLine, ShoppingListItem};

/// Merge ingredient lines into shopping list rows sorted by name, then unit.
///
/// Amounts are summed as `i64` so large carts cannot overflow a single line's `i32`.
/// The output does not depend on the order of `lines`.
pub fn compile<'a, I>(lines: I) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = &'a IngredientLine>,
{
    let mut groups: BTreeMap<(&str, &str), i64> = BTreeMap::new();
    for line in lines {
        *groups
            .entry((line.name.as_str(), line.measurement_unit.as_str()))
            .or_default() += i64::from(line.amount);
    }
    groups
        .into_iter()
        .map(|((name, unit), amount)| ShoppingListItem {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        })
        .collect()
}
