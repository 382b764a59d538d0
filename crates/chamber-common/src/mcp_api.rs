use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchDirectoryParams {
    /// Category to keep, or "all" (default).
    pub category: Option<String>,
    /// Membership tier to keep ("gold", "silver", "bronze", "nonprofit"), or "all" (default).
    pub tier: Option<String>,
    /// Case-insensitive substring matched against name, description and category.
    pub query: Option<String>,
    /// One of "name-asc" (default), "name-desc", "newest", "oldest".
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateCriteriaParams {
    /// Which criterion to change: "category", "tier", "query" or "sort".
    pub field: String,
    /// The new value for that criterion.
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMemberParams {
    /// Member identifier as listed on its card.
    pub member_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SpotlightParams {
    /// Number of spotlights to return (default: 3, max: 10).
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RecordVisitParams {
    /// Stable identifier of the visiting browser or client.
    pub visitor_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitApplicationParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub org_name: String,
    /// Membership level: "np", "bronze", "silver" or "gold".
    pub membership: String,
    /// Optional business description (max 500 characters).
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MemberCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub tier: String,
    /// Badge label, absent for tiers without one.
    pub badge: Option<String>,
    pub description: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Digits-only dial target for the phone number.
    pub phone_href: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CriteriaSummary {
    pub category: String,
    pub tier: String,
    pub query: String,
    pub sort: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryViewResponse {
    pub criteria: CriteriaSummary,
    /// e.g. "1 business found", "3 businesses found".
    pub count_text: String,
    pub empty_state_visible: bool,
    pub results_visible: bool,
    /// Inline notice shown alongside the results, if any.
    pub notice: Option<String>,
    pub cards: Vec<MemberCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    pub name: String,
    pub member_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryInfo>,
    pub total_members: usize,
    pub from_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberDetailResponse {
    pub member: MemberCard,
    pub established: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpotlightCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpotlightResponse {
    pub spotlights: Vec<SpotlightCard>,
    pub from_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VisitResponse {
    pub message: String,
    /// Whole days since the previous visit, absent on a first visit.
    pub days_since: Option<u64>,
    /// Whether this visit was stored for next time.
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub org_name: String,
    pub membership: String,
    /// e.g. "142/500 characters".
    pub description_count: String,
    /// At or past 90% of the description limit.
    pub description_near_limit: bool,
    /// e.g. "January 15, 2024 at 3:45 PM".
    pub submitted_at: String,
}
