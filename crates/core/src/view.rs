use std::fmt::Write;

use crate::category::Category;
use crate::item::Item;
use crate::status::Status;

#[derive(Debug, PartialEq, Eq)]
pub struct SubgroupView<'a> {
    pub status: Status,
    pub items: Vec<&'a Item>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CategoryView<'a> {
    pub category: Category,
    pub subgroups: Vec<SubgroupView<'a>>,
}

/// Most-recently-updated first; stable, so ties keep collection order.
fn sort_bucket(bucket: &mut [&Item]) {
    bucket.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Partition items by category (declared enum order) and, within each
/// category, by status (Need, Buy, Think, Taken). Empty categories and empty
/// subgroups are omitted; every item lands in exactly one bucket.
pub fn group_by_category_and_status(items: &[Item]) -> Vec<CategoryView<'_>> {
    let mut views = Vec::new();
    for category in Category::ALL {
        let in_category: Vec<&Item> =
            items.iter().filter(|it| it.category == category).collect();
        if in_category.is_empty() {
            continue;
        }

        let mut subgroups = Vec::new();
        for status in Status::ALL {
            let mut bucket: Vec<&Item> = in_category
                .iter()
                .copied()
                .filter(|it| it.status == status)
                .collect();
            if bucket.is_empty() {
                continue;
            }
            sort_bucket(&mut bucket);
            subgroups.push(SubgroupView { status, items: bucket });
        }
        views.push(CategoryView { category, subgroups });
    }
    views
}

/// All items of one status across categories, most-recently-updated first.
pub fn subgroup(items: &[Item], status: Status) -> Vec<&Item> {
    let mut bucket: Vec<&Item> = items.iter().filter(|it| it.status == status).collect();
    sort_bucket(&mut bucket);
    bucket
}

pub fn count_by_status(items: &[Item], status: Status) -> usize {
    items.iter().filter(|it| it.status == status).count()
}

/// Items still to pack: everything not yet Taken.
pub fn count_outstanding(items: &[Item]) -> usize {
    items.iter().filter(|it| it.status != Status::Taken).count()
}

/// Plain-text rendering of one subgroup for clipboard export:
///
/// ```text
/// Subgroup: Buy
/// Documents and money:
/// - Passport
/// ```
pub fn subgroup_text(items: &[Item], status: Status) -> String {
    let members = subgroup(items, status);
    let mut out = String::new();
    let _ = writeln!(out, "Subgroup: {}", status.label());
    for category in Category::ALL {
        let names: Vec<&str> = members
            .iter()
            .filter(|it| it.category == category)
            .map(|it| it.name.as_str())
            .collect();
        if names.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}:", category.label());
        for name in names {
            let _ = writeln!(out, "- {name}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use std::collections::BTreeSet;

    fn item(name: &str, category: Category, status: Status, updated_at: i64) -> Item {
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            category,
            status,
            created_at: updated_at,
            updated_at,
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("Passport", Category::Documents, Status::Need, 100),
            item("Tickets", Category::Documents, Status::Need, 300),
            item("Visa copy", Category::Documents, Status::Buy, 200),
            item("Socks", Category::Clothing, Status::Need, 150),
            item("Boots", Category::Footwear, Status::Taken, 400),
            item("Charger", Category::Electronics, Status::Think, 250),
        ]
    }

    #[test]
    fn grouping_never_drops_or_duplicates() {
        let items = sample();
        let views = group_by_category_and_status(&items);

        let mut seen = Vec::new();
        for view in &views {
            for sub in &view.subgroups {
                for it in &sub.items {
                    assert_eq!(it.category, view.category);
                    assert_eq!(it.status, sub.status);
                    seen.push(it.id);
                }
            }
        }
        assert_eq!(seen.len(), items.len());
        let ids: BTreeSet<_> = seen.iter().copied().collect();
        let expected: BTreeSet<_> = items.iter().map(|it| it.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn categories_follow_declared_order_and_omit_empty() {
        let items = sample();
        let views = group_by_category_and_status(&items);

        let order: Vec<Category> = views.iter().map(|v| v.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Documents,
                Category::Clothing,
                Category::Footwear,
                Category::Electronics,
            ]
        );
    }

    #[test]
    fn subgroups_follow_status_order() {
        let items = sample();
        let views = group_by_category_and_status(&items);
        let documents = &views[0];
        let statuses: Vec<Status> = documents.subgroups.iter().map(|s| s.status).collect();
        assert_eq!(statuses, vec![Status::Need, Status::Buy]);
    }

    #[test]
    fn buckets_sort_descending_by_updated_at() {
        let items = sample();
        let views = group_by_category_and_status(&items);
        let need_docs = &views[0].subgroups[0];
        let names: Vec<&str> = need_docs.items.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["Tickets", "Passport"]);
    }

    #[test]
    fn equal_stamps_keep_collection_order() {
        let items = vec![
            item("First", Category::Other, Status::Need, 500),
            item("Second", Category::Other, Status::Need, 500),
            item("Third", Category::Other, Status::Need, 500),
        ];
        let bucket = subgroup(&items, Status::Need);
        let names: Vec<&str> = bucket.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn outstanding_is_total_minus_taken() {
        let items = sample();
        assert_eq!(
            count_outstanding(&items),
            items.len() - count_by_status(&items, Status::Taken)
        );
        assert_eq!(count_outstanding(&items), 5);
    }

    #[test]
    fn empty_collection_counts() {
        let items: Vec<Item> = Vec::new();
        assert_eq!(count_outstanding(&items), 0);
        assert!(group_by_category_and_status(&items).is_empty());
    }

    #[test]
    fn subgroup_text_groups_by_category() {
        let items = vec![
            item("Passport", Category::Documents, Status::Buy, 100),
            item("Adapter", Category::Electronics, Status::Buy, 200),
            item("Socks", Category::Clothing, Status::Need, 300),
        ];
        let text = subgroup_text(&items, Status::Buy);
        assert_eq!(
            text,
            "Subgroup: Buy\nDocuments and money:\n- Passport\nElectronics:\n- Adapter\n"
        );
    }
}
