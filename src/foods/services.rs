use std::cmp::Ordering;
use std::str::FromStr;

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

use crate::error::FoodError;
use crate::foods::expiry::{classify_record, CalendarValue, Classification, ExpiryStatus};
use crate::foods::repo_types::{FoodCategory, FoodRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessCounts {
    pub total: usize,
    pub fresh: usize,
    pub expiring_soon: usize,
    pub expired: usize,
}

impl FreshnessCounts {
    fn add(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Fresh => self.fresh += 1,
            Classification::ExpiringSoon => self.expiring_soon += 1,
            Classification::Expired => self.expired += 1,
        }
    }
}

/// Counts over the records that could be classified, plus the ones that could not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub counts: FreshnessCounts,
    pub invalid: Vec<FoodError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedFood<'a> {
    pub record: &'a FoodRecord,
    pub status: ExpiryStatus,
}

/// Per-record classification; a bad date only fails its own entry.
pub fn classify_all<'a, I>(
    records: I,
    now: OffsetDateTime,
) -> Vec<(&'a FoodRecord, Result<ExpiryStatus, FoodError>)>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    records
        .into_iter()
        .map(|record| {
            let status = classify_record(record, now);
            if let Err(e) = &status {
                warn!(error = %e, "food has an unreadable expiry date");
            }
            (record, status)
        })
        .collect()
}

pub fn summarize<'a, I>(records: I, now: OffsetDateTime) -> Summary
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut summary = Summary::default();
    for (_, status) in classify_all(records, now) {
        match status {
            Ok(status) => summary.counts.add(status.classification),
            Err(e) => summary.invalid.push(e),
        }
    }
    summary
}

#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub fresh: Vec<ClassifiedFood<'a>>,
    pub expiring_soon: Vec<ClassifiedFood<'a>>,
    pub expired: Vec<ClassifiedFood<'a>>,
    pub invalid: Vec<FoodError>,
}

/// Buckets records by classification, keeping input order within each bucket.
pub fn partition<'a, I>(records: I, now: OffsetDateTime) -> Partition<'a>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut out = Partition::default();
    for (record, status) in classify_all(records, now) {
        let status = match status {
            Ok(s) => s,
            Err(e) => {
                out.invalid.push(e);
                continue;
            }
        };
        let item = ClassifiedFood { record, status };
        match status.classification {
            Classification::Fresh => out.fresh.push(item),
            Classification::ExpiringSoon => out.expiring_soon.push(item),
            Classification::Expired => out.expired.push(item),
        }
    }
    out
}

/// Expiring-soon items, fewest days left first.
pub fn expiring_soon<'a, I>(records: I, now: OffsetDateTime, limit: usize) -> Vec<ClassifiedFood<'a>>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut items = partition(records, now).expiring_soon;
    items.sort_by_key(|item| item.status.days_until_expiry);
    items.truncate(limit);
    items
}

pub fn expired<'a, I>(records: I, now: OffsetDateTime) -> Vec<ClassifiedFood<'a>>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    partition(records, now).expired
}

/// Random pick of items that are not expired yet.
pub fn featured<'a, I, R>(records: I, now: OffsetDateTime, limit: usize, rng: &mut R) -> Vec<ClassifiedFood<'a>>
where
    I: IntoIterator<Item = &'a FoodRecord>,
    R: Rng + ?Sized,
{
    let parts = partition(records, now);
    let mut pool: Vec<_> = parts.fresh.into_iter().chain(parts.expiring_soon).collect();
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}

/// Most recently added first. Items without a readable added date go last.
pub fn recent<'a, I>(records: I, limit: usize) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut keyed: Vec<_> = records
        .into_iter()
        .map(|r| {
            let added = r
                .added_date
                .as_deref()
                .and_then(CalendarValue::parse)
                .map(|d| d.sort_key(UtcOffset::UTC));
            (added, r)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| missing_last(a, b, SortDirection::Descending));
    keyed.into_iter().take(limit).map(|(_, r)| r).collect()
}

/// Records added by `email`; comparison ignores case and surrounding spaces.
pub fn owned_by<'a, I>(records: I, email: &str) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let email = email.trim().to_lowercase();
    records
        .into_iter()
        .filter(|r| r.owner_email.trim().to_lowercase() == email)
        .collect()
}

/// Notes can be attached once, by the owner only.
pub fn can_attach_note(record: &FoodRecord, user_email: &str) -> bool {
    let is_owner = !user_email.trim().is_empty()
        && record.owner_email.trim().eq_ignore_ascii_case(user_email.trim());
    let has_note = record.note.as_deref().is_some_and(|n| !n.trim().is_empty());
    is_owner && !has_note
}

pub fn filter_by_category<'a, I>(records: I, category: Option<&FoodCategory>) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    match category {
        None => records.into_iter().collect(),
        Some(category) => records
            .into_iter()
            .filter(|r| &r.category == category)
            .collect(),
    }
}

/// Case-insensitive substring match on title or category label.
pub fn search_by_title_or_category<'a, I>(records: I, query: &str) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|r| {
            r.title.to_lowercase().contains(&needle)
                || r.category.label().to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    ExpiryDate,
    Category,
}

impl FromStr for SortKey {
    type Err = FoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(SortKey::Title),
            "expiryDate" | "expiry_date" | "expiry" => Ok(SortKey::ExpiryDate),
            "category" => Ok(SortKey::Category),
            other => Err(FoodError::InvalidArgument(format!("unknown sort key '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = FoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(FoodError::InvalidArgument(format!("unknown sort order '{other}'"))),
        }
    }
}

// Present values ordered by `direction`; missing values always trail.
fn missing_last<T: Ord>(a: &Option<T>, b: &Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort into a new vector. Expiry values are compared by their local
/// day in `offset`, so the order matches `daysUntilExpiry`. Unreadable expiry
/// dates sort last in either direction.
pub fn sort_records<'a, I>(
    records: I,
    key: SortKey,
    direction: SortDirection,
    offset: UtcOffset,
) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let records = records.into_iter();
    match key {
        SortKey::Title => sort_by_text(records, direction, |r| r.title.to_lowercase()),
        SortKey::Category => sort_by_text(records, direction, |r| r.category.label().to_lowercase()),
        SortKey::ExpiryDate => {
            let mut keyed: Vec<_> = records
                .map(|r| (CalendarValue::parse(&r.expiry_date).map(|d| d.sort_key(offset)), r))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| missing_last(a, b, direction));
            keyed.into_iter().map(|(_, r)| r).collect()
        }
    }
}

fn sort_by_text<'a>(
    records: impl Iterator<Item = &'a FoodRecord>,
    direction: SortDirection,
    key: impl Fn(&FoodRecord) -> String,
) -> Vec<&'a FoodRecord> {
    let mut keyed: Vec<_> = records.map(|r| (key(r), r)).collect();
    keyed.sort_by(|(a, _), (b, _)| direction.apply(a.cmp(b)));
    keyed.into_iter().map(|(_, r)| r).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// 1-based page of `items`. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Result<Page<T>, FoodError> {
    if page_size == 0 {
        return Err(FoodError::InvalidArgument("page_size must be >= 1".into()));
    }
    if page == 0 {
        return Err(FoodError::InvalidArgument("page numbers start at 1".into()));
    }
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total,
        total_pages: total.div_ceil(page_size),
    })
}

/// Filters, ordering and paging applied to a listing, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub owner: Option<String>,
    pub category: Option<FoodCategory>,
    pub search: Option<String>,
    pub sort: Option<(SortKey, SortDirection)>,
    pub page: usize,
    pub page_size: usize,
}

/// One listed record with its classification, or the reason it has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem<'a> {
    pub record: &'a FoodRecord,
    pub status: Result<ExpiryStatus, FoodError>,
}

pub fn build_view<'a>(
    records: &'a [FoodRecord],
    now: OffsetDateTime,
    query: &ViewQuery,
) -> Result<Page<ViewItem<'a>>, FoodError> {
    let mut selected: Vec<&FoodRecord> = match query.owner.as_deref() {
        Some(owner) => owned_by(records, owner),
        None => records.iter().collect(),
    };
    selected = filter_by_category(selected, query.category.as_ref());
    if let Some(q) = query.search.as_deref() {
        selected = search_by_title_or_category(selected, q);
    }
    if let Some((key, direction)) = query.sort {
        selected = sort_records(selected, key, direction, now.offset());
    }

    let page = paginate(&selected, query.page_size, query.page)?;
    let items = classify_all(page.items, now)
        .into_iter()
        .map(|(record, status)| ViewItem { record, status })
        .collect();
    Ok(Page {
        items,
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        total_pages: page.total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-10 09:30:00 UTC);

    fn food(id: &str, title: &str, category: FoodCategory, expiry: &str) -> FoodRecord {
        FoodRecord {
            id: id.into(),
            title: title.into(),
            image_url: format!("https://img.example/{id}.jpg"),
            category,
            quantity: "1".into(),
            added_date: Some("2024-06-01".into()),
            expiry_date: expiry.into(),
            owner_email: "ana@example.com".into(),
            description: None,
            note: None,
        }
    }

    fn scenario() -> Vec<FoodRecord> {
        vec![
            food("a", "Milk", FoodCategory::Dairy, "2024-06-10"),
            food("b", "Dark Chocolate", FoodCategory::SweetsAndSnacks, "2024-06-07"),
            food("c", "Chicken", FoodCategory::Proteins, "2024-06-13"),
            food("d", "Rice", FoodCategory::Grains, "2024-06-20"),
        ]
    }

    fn ids(records: &[&FoodRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn summarize_survives_timestamps_at_the_end_of_the_date_range() {
        let records = vec![
            food("edge", "Honey", FoodCategory::SweetsAndSnacks, "9999-12-31T23:00:00-05:00"),
            food("a", "Milk", FoodCategory::Dairy, "2024-06-10"),
        ];
        let summary = summarize(&records, datetime!(2024-06-10 09:00:00 +6));
        assert_eq!(summary.counts.total, 2);
        assert_eq!(summary.counts.fresh, 1);
        assert_eq!(summary.counts.expiring_soon, 1);
        assert!(summary.invalid.is_empty());
    }

    #[test]
    fn summarize_scenario() {
        let records = scenario();
        let summary = summarize(&records, NOW);
        assert_eq!(
            summary.counts,
            FreshnessCounts { total: 4, fresh: 1, expiring_soon: 2, expired: 1 }
        );
        assert!(summary.invalid.is_empty());
    }

    #[test]
    fn summarize_counts_always_partition_the_total() {
        let records: Vec<FoodRecord> = (-10..=10)
            .map(|offset| {
                let day = NOW.date() + time::Duration::days(offset);
                food(&offset.to_string(), "x", FoodCategory::Fruits, &day.to_string())
            })
            .collect();
        let c = summarize(&records, NOW).counts;
        assert_eq!(c.total, records.len());
        assert_eq!(c.fresh + c.expiring_soon + c.expired, c.total);
        assert_eq!(c.expired, 10);
        assert_eq!(c.expiring_soon, 4);
        assert_eq!(c.fresh, 7);
    }

    #[test]
    fn summarize_is_idempotent_and_leaves_input_alone() {
        let records = scenario();
        let before = records.clone();
        let first = summarize(&records, NOW);
        let second = summarize(&records, NOW);
        assert_eq!(first, second);
        assert_eq!(records, before);
    }

    #[test]
    fn bad_dates_are_isolated_to_their_record() {
        let mut records = scenario();
        records.push(food("bad", "Mystery", FoodCategory::Other("Misc".into()), "soon-ish"));

        let summary = summarize(&records, NOW);
        assert_eq!(summary.counts.total, 4);
        assert_eq!(
            summary.invalid,
            vec![FoodError::InvalidDate { id: "bad".into(), value: "soon-ish".into() }]
        );

        let parts = partition(&records, NOW);
        assert_eq!(parts.fresh.len() + parts.expiring_soon.len() + parts.expired.len(), 4);
        assert_eq!(parts.invalid.len(), 1);
    }

    #[test]
    fn partition_keeps_input_order_within_buckets() {
        let records = scenario();
        let parts = partition(&records, NOW);
        let soon: Vec<_> = parts.expiring_soon.iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(soon, ["a", "c"]);
        assert_eq!(parts.expired[0].record.id, "b");
        assert_eq!(parts.fresh[0].record.id, "d");
    }

    #[test]
    fn expiring_soon_orders_by_days_left_and_limits() {
        let records = vec![
            food("late", "Yogurt", FoodCategory::Dairy, "2024-06-13"),
            food("today", "Bread", FoodCategory::Grains, "2024-06-10"),
            food("mid", "Eggs", FoodCategory::Proteins, "2024-06-11"),
        ];
        let soon = expiring_soon(&records, NOW, 2);
        let ids: Vec<_> = soon.iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(ids, ["today", "mid"]);

        assert_eq!(expired(&records, NOW).len(), 0);
    }

    #[test]
    fn featured_never_includes_expired_items() {
        let records = scenario();
        let mut rng = StdRng::seed_from_u64(7);
        let picks = featured(&records, NOW, 6, &mut rng);
        assert_eq!(picks.len(), 3);
        assert!(picks
            .iter()
            .all(|c| c.status.classification != Classification::Expired));

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(featured(&records, NOW, 2, &mut rng).len(), 2);
    }

    #[test]
    fn recent_puts_newest_first_and_undated_last() {
        let mut records = scenario();
        records[0].added_date = Some("2024-06-03".into());
        records[1].added_date = None;
        records[2].added_date = Some("2024-06-09T18:00:00Z".into());
        records[3].added_date = Some("2024-05-28".into());

        assert_eq!(ids(&recent(&records, 10)), ["c", "a", "d", "b"]);
        assert_eq!(ids(&recent(&records, 2)), ["c", "a"]);
    }

    #[test]
    fn owner_filter_and_note_permission() {
        let mut records = scenario();
        records[1].owner_email = "Bob@Example.com".into();

        assert_eq!(ids(&owned_by(&records, " bob@example.com ")), ["b"]);
        assert_eq!(owned_by(&records, "ana@example.com").len(), 3);

        assert!(can_attach_note(&records[1], "bob@example.com"));
        assert!(!can_attach_note(&records[1], "ana@example.com"));
        assert!(!can_attach_note(&records[1], ""));

        records[1].note = Some("opened on monday".into());
        assert!(!can_attach_note(&records[1], "bob@example.com"));
    }

    #[test]
    fn category_filter_is_identity_without_selector() {
        let records = scenario();
        assert_eq!(filter_by_category(&records, None).len(), records.len());

        let dairy = filter_by_category(&records, Some(&FoodCategory::Dairy));
        assert_eq!(ids(&dairy), ["a"]);
        assert!(filter_by_category(&records, Some(&FoodCategory::Beverages)).is_empty());
    }

    #[test]
    fn search_scenario() {
        let records = vec![
            food("1", "Milk", FoodCategory::Dairy, "2024-06-12"),
            food("2", "Dark Chocolate", FoodCategory::SweetsAndSnacks, "2024-06-12"),
            food("3", "Chicken", FoodCategory::Proteins, "2024-06-12"),
        ];
        assert_eq!(ids(&search_by_title_or_category(&records, "choc")), ["2"]);
        assert_eq!(ids(&search_by_title_or_category(&records, "PROTEIN")), ["3"]);
        assert_eq!(search_by_title_or_category(&records, "   ").len(), 3);
        assert!(search_by_title_or_category(&records, "tofu").is_empty());
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let records = vec![
            food("1", "apple", FoodCategory::Fruits, "2024-06-12"),
            food("2", "Banana", FoodCategory::Fruits, "2024-06-12"),
            food("3", "Apple", FoodCategory::Fruits, "2024-06-12"),
        ];
        let asc = sort_records(&records, SortKey::Title, SortDirection::Ascending, UtcOffset::UTC);
        assert_eq!(ids(&asc), ["1", "3", "2"]);

        let desc = sort_records(&records, SortKey::Title, SortDirection::Descending, UtcOffset::UTC);
        assert_eq!(ids(&desc), ["2", "1", "3"]);
    }

    #[test]
    fn expiry_sort_compares_dates_not_strings() {
        let records = vec![
            // 2024-06-10 04:00 UTC, after the plain date below
            food("tz", "Soup", FoodCategory::Other("Soups".into()), "2024-06-09T23:00:00-05:00"),
            food("bad", "Jam", FoodCategory::Fruits, "whenever"),
            food("plain", "Tea", FoodCategory::Beverages, "2024-06-10"),
            food("early", "Kale", FoodCategory::Vegetables, "2024-01-02"),
        ];
        let asc = sort_records(&records, SortKey::ExpiryDate, SortDirection::Ascending, UtcOffset::UTC);
        assert_eq!(ids(&asc), ["early", "plain", "tz", "bad"]);

        let desc = sort_records(&records, SortKey::ExpiryDate, SortDirection::Descending, UtcOffset::UTC);
        assert_eq!(ids(&desc), ["tz", "plain", "early", "bad"]);
    }

    #[test]
    fn expiry_sort_agrees_with_days_left_outside_utc() {
        let now = datetime!(2024-06-10 09:00:00 -5);
        let records = vec![
            food("plain", "Tea", FoodCategory::Beverages, "2024-06-12"),
            // 2024-06-12T01:00Z, still June 11 at -05:00
            food("stamp", "Soup", FoodCategory::Other("Soups".into()), "2024-06-11T20:00:00-05:00"),
        ];
        let sorted = sort_records(&records, SortKey::ExpiryDate, SortDirection::Ascending, now.offset());
        assert_eq!(ids(&sorted), ["stamp", "plain"]);

        let days: Vec<_> = classify_all(sorted, now)
            .into_iter()
            .map(|(_, status)| status.map(|s| s.days_until_expiry))
            .collect();
        assert_eq!(days, [Ok(1), Ok(2)]);
    }

    #[test]
    fn category_sort_ignores_case() {
        let records = scenario();
        let sorted = sort_records(&records, SortKey::Category, SortDirection::Ascending, UtcOffset::UTC);
        assert_eq!(ids(&sorted), ["a", "d", "c", "b"]);
        assert_eq!(records, scenario());
    }

    #[test]
    fn sort_arguments_are_validated() {
        assert_eq!("expiryDate".parse::<SortKey>(), Ok(SortKey::ExpiryDate));
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert!(matches!(
            "price".parse::<SortKey>(),
            Err(FoodError::InvalidArgument(_))
        ));
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn pagination_scenario() {
        let items: Vec<u32> = (1..=10).collect();
        let sizes: Vec<_> = (1..=4)
            .map(|p| paginate(&items, 4, p).expect("valid page").items.len())
            .collect();
        assert_eq!(sizes, [4, 4, 2, 0]);
        assert_eq!(paginate(&items, 4, 1).unwrap().total_pages, 3);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 4, 1).unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..=25 {
            let total_pages = paginate(&items, size, 1).unwrap().total_pages;
            let joined: Vec<u32> = (1..=total_pages)
                .flat_map(|p| paginate(&items, size, p).unwrap().items)
                .collect();
            assert_eq!(joined, items, "page size {size}");
        }
    }

    #[test]
    fn pagination_rejects_bad_arguments() {
        let items = [1, 2, 3];
        assert!(matches!(paginate(&items, 0, 1), Err(FoodError::InvalidArgument(_))));
        assert!(matches!(paginate(&items, 2, 0), Err(FoodError::InvalidArgument(_))));
        assert!(paginate(&items, 2, usize::MAX).unwrap().items.is_empty());
    }

    #[test]
    fn view_applies_filters_then_sort_then_page() {
        let mut records = scenario();
        records.push(food("e", "Cheddar", FoodCategory::Dairy, "2024-06-30"));
        records.push(food("f", "Butter", FoodCategory::Dairy, "not a date"));
        records[0].owner_email = "someone@else.com".into();

        let query = ViewQuery {
            owner: Some("ana@example.com".into()),
            category: Some(FoodCategory::Dairy),
            search: None,
            sort: Some((SortKey::Title, SortDirection::Ascending)),
            page: 1,
            page_size: 10,
        };
        let page = build_view(&records, NOW, &query).expect("view");
        assert_eq!(page.total, 2);
        let titles: Vec<_> = page.items.iter().map(|i| i.record.title.as_str()).collect();
        assert_eq!(titles, ["Butter", "Cheddar"]);
        assert!(page.items[0].status.is_err());
        assert_eq!(
            page.items[1].status.as_ref().map(|s| s.classification),
            Ok(Classification::Fresh)
        );

        let bad = ViewQuery { page_size: 0, ..query };
        assert!(build_view(&records, NOW, &bad).is_err());
    }
}
