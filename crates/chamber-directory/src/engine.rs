/// Filter-sort engine: derives the visible, ordered member list from the full
/// store and the current criteria.
///
/// Category, tier and text filters are ANDed; sorting runs over the survivors
/// and is stable, so equal keys keep store order. Category and tier matching is
/// case-insensitive on both sides.
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use icu_collator::{options::CollatorOptions, Collator, CollatorBorrowed};
use tracing::debug;

use crate::error::AppError;
use crate::model::{Record, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

fn is_all_sentinel(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

impl Filter<String> {
    pub fn category(raw: &str) -> Self {
        if is_all_sentinel(raw) {
            Self::All
        } else {
            Self::Only(raw.trim().to_string())
        }
    }

    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.to_lowercase() == category.trim().to_lowercase(),
        }
    }
}

impl Filter<Tier> {
    pub fn tier(raw: &str) -> Self {
        if is_all_sentinel(raw) {
            Self::All
        } else {
            Self::Only(Tier::parse(raw))
        }
    }

    pub fn admits(&self, tier: &Tier) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == tier,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    Newest,
    Oldest,
}

impl SortKey {
    /// Unknown keys fall back to name ascending.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name-asc" | "" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            other => {
                debug!(sort = other, "unknown sort key, using name-asc");
                Self::NameAsc
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria {
    pub category: Filter<String>,
    pub tier: Filter<Tier>,
    pub query: String,
    pub sort: SortKey,
}

impl Criteria {
    pub fn from_params(
        category: Option<&str>,
        tier: Option<&str>,
        query: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            category: category.map(Filter::category).unwrap_or_default(),
            tier: tier.map(Filter::tier).unwrap_or_default(),
            query: query.map(|q| q.trim().to_string()).unwrap_or_default(),
            sort: sort.map(SortKey::parse).unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, change: CriteriaChange) {
        match change {
            CriteriaChange::Category(raw) => self.category = Filter::category(&raw),
            CriteriaChange::Tier(raw) => self.tier = Filter::tier(&raw),
            CriteriaChange::Query(raw) => self.query = raw.trim().to_string(),
            CriteriaChange::Sort(raw) => self.sort = SortKey::parse(&raw),
        }
    }
}

/// A single user action: exactly one criterion changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaChange {
    Category(String),
    Tier(String),
    Query(String),
    Sort(String),
}

impl CriteriaChange {
    pub fn parse(field: &str, value: &str) -> Result<Self, AppError> {
        let value = value.to_string();
        match field.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category(value)),
            "tier" | "membership" => Ok(Self::Tier(value)),
            "query" | "search" => Ok(Self::Query(value)),
            "sort" => Ok(Self::Sort(value)),
            other => Err(AppError::UnknownField(other.to_string())),
        }
    }
}

/// Which record fields the free-text query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    pub name: bool,
    pub description: bool,
    pub category: bool,
    pub address: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            name: true,
            description: true,
            category: true,
            address: false,
        }
    }
}

impl SearchFields {
    pub fn with_address(mut self, address: bool) -> Self {
        self.address = address;
        self
    }

    /// Lowercased searchable text of `record`, one field per line.
    fn haystack(&self, record: &Record) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        if self.name {
            parts.push(&record.name);
        }
        if self.description {
            parts.push(&record.description);
        }
        if self.category {
            parts.push(&record.category);
        }
        if self.address {
            if let Some(address) = record.address.as_deref() {
                parts.push(address);
            }
        }
        parts.join("\n").to_lowercase()
    }
}

pub fn derive_view<'a>(
    records: &'a [Record],
    criteria: &Criteria,
    fields: &SearchFields,
) -> Vec<&'a Record> {
    let needle = criteria.query.trim().to_lowercase();

    let mut view: Vec<&Record> = records
        .iter()
        .filter(|r| criteria.category.admits(&r.category))
        .filter(|r| criteria.tier.admits(&r.tier))
        .filter(|r| needle.is_empty() || fields.haystack(r).contains(&needle))
        .collect();

    match criteria.sort {
        SortKey::NameAsc => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => view.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::Newest => view.sort_by(|a, b| compare_years(a.established, b.established, true)),
        SortKey::Oldest => view.sort_by(|a, b| compare_years(a.established, b.established, false)),
    }

    view
}

static COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    Collator::try_new(Default::default(), CollatorOptions::default())
        .expect("compiled collation data")
});

/// Collation order (accents and case are secondary to the base letters);
/// identical collation keys fall back to the raw strings, lowercase first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR.compare(a, b).then_with(|| b.cmp(a))
}

/// Records without a year sort last in both directions.
fn compare_years(a: Option<i32>, b: Option<i32>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
