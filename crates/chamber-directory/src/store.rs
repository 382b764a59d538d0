/// The record store: the full, unfiltered member list, loaded once at startup.
///
/// If the data document cannot be fetched or parsed, the store is populated with
/// a fixed set of gold members instead, so the directory is never blank.
use serde::Deserialize;
use tracing::{info, warn};

use chamber_common::fetch::{DataSource, Document, Fetcher};

use crate::error::AppError;
use crate::model::{Category, Record, RecordId, Tier};

pub const ALL_CATEGORIES: &str = "All";

#[derive(Deserialize)]
#[serde(untagged)]
enum DataDocument {
    Wrapped {
        members: Vec<Record>,
        #[serde(default)]
        categories: Vec<String>,
    },
    Bare(Vec<Record>),
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    declared_categories: Vec<String>,
    fingerprint: Option<String>,
    fallback: bool,
}

impl RecordStore {
    /// Fetch and parse the data document, substituting the fallback set on failure.
    pub async fn load(source: &DataSource, fetcher: &Fetcher) -> Self {
        let loaded = match fetcher.fetch(source).await {
            Ok(doc) => Self::from_document(&doc),
            Err(e) => Err(AppError::from(e)),
        };

        match loaded {
            Ok(store) => {
                info!(
                    source = %source,
                    members = store.len(),
                    fingerprint = store.fingerprint.as_deref().unwrap_or_default(),
                    "member data loaded"
                );
                store
            }
            Err(e) => {
                warn!(source = %source, error = %e, "failed to load member data, using fallback members");
                Self::fallback()
            }
        }
    }

    pub fn from_document(doc: &Document) -> Result<Self, AppError> {
        let (records, declared_categories) = match serde_json::from_slice(&doc.bytes)? {
            DataDocument::Wrapped { members, categories } => (members, categories),
            DataDocument::Bare(members) => (members, Vec::new()),
        };
        Ok(Self {
            records,
            declared_categories,
            fingerprint: Some(doc.fingerprint.clone()),
            fallback: false,
        })
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            declared_categories: Vec::new(),
            fingerprint: None,
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            fallback: true,
            ..Self::from_records(fallback_records())
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id.matches(id))
    }

    /// Categories for the filter chips, headed by "All".
    ///
    /// Uses the document's declared list when present, otherwise the distinct
    /// record categories in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut names: Vec<String> = Vec::new();
        let declared = self
            .declared_categories
            .iter()
            .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES));
        let seen = self.records.iter().map(|r| &r.category);
        let source: Box<dyn Iterator<Item = &String>> = if self.declared_categories.is_empty() {
            Box::new(seen)
        } else {
            Box::new(declared)
        };
        for name in source {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.clone());
            }
        }

        let mut categories = Vec::with_capacity(names.len() + 1);
        categories.push(Category {
            name: ALL_CATEGORIES.to_string(),
            member_count: self.records.len(),
        });
        categories.extend(names.into_iter().map(|name| {
            let member_count = self
                .records
                .iter()
                .filter(|r| r.category.trim().to_lowercase() == name.trim().to_lowercase())
                .count();
            Category { name, member_count }
        }));
        categories
    }
}

fn fallback_member(id: i64, name: &str, category: &str, description: &str, image: &str) -> Record {
    Record {
        id: RecordId::Number(id),
        name: name.to_string(),
        category: category.to_string(),
        tier: Tier::Gold,
        description: description.to_string(),
        established: None,
        address: None,
        phone: None,
        website: Some("#".to_string()),
        image: Some(image.to_string()),
    }
}

pub fn fallback_records() -> Vec<Record> {
    vec![
        fallback_member(
            1,
            "Gilbert Family Dentistry",
            "Healthcare",
            "Comprehensive dental care for the whole family, from routine cleanings to cosmetic procedures.",
            "images/business-dental.webp",
        ),
        fallback_member(
            3,
            "Agritopia Farm Stand",
            "Food & Agriculture",
            "Fresh, locally grown produce and artisan goods from Gilbert's premier urban farm community.",
            "images/business-farm.webp",
        ),
        fallback_member(
            4,
            "Heritage Tech Solutions",
            "Technology",
            "IT consulting and managed services for small to medium businesses in the East Valley.",
            "images/business-tech.webp",
        ),
        fallback_member(
            8,
            "Cactus Creative Agency",
            "Marketing",
            "Full-service marketing and design agency helping Arizona businesses grow.",
            "images/business-creative.webp",
        ),
        fallback_member(
            14,
            "East Valley Pediatrics",
            "Healthcare",
            "Compassionate pediatric care from newborns through adolescence.",
            "images/business-pediatrics.webp",
        ),
        fallback_member(
            15,
            "Arizona Solar Pros",
            "Home Services",
            "Residential and commercial solar installation with financing options.",
            "images/business-solar.webp",
        ),
        fallback_member(
            18,
            "Heritage District Realty",
            "Real Estate",
            "Local experts in Gilbert residential and commercial real estate.",
            "images/business-realty.webp",
        ),
    ]
}
