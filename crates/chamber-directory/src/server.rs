/// MCP server for the chamber member directory.
///
/// Exposes eight tools:
/// - `search_directory`: One-shot filtered, sorted and rendered directory view
/// - `update_directory_criteria`: Change one criterion of the shared live view
/// - `get_directory_view`: The shared live view as last rendered
/// - `list_categories`: Categories with member counts
/// - `get_member`: A single member card by ID
/// - `get_spotlights`: Random gold-member spotlights
/// - `record_visit`: Welcome message based on the visitor's last visit
/// - `submit_application`: Validate a membership application
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::application::Application;
use crate::controller::DirectoryController;
use crate::engine::{Criteria, CriteriaChange, SearchFields};
use crate::error::AppError;
use crate::live::LiveDirectory;
use crate::render::{Card, RenderConfig, RenderedView, ViewSurface};
use crate::spotlight::{pick_spotlights, DEFAULT_SPOTLIGHTS};
use crate::store::RecordStore;
use crate::visits::{now_ms, VisitTracker};
use chamber_common::mcp_api::{
    ApplicationResponse, CategoryInfo, CategoryListResponse, CriteriaSummary,
    DirectoryViewResponse, GetMemberParams, MemberCard, MemberDetailResponse, RecordVisitParams,
    SearchDirectoryParams, SpotlightCard, SpotlightParams, SpotlightResponse,
    SubmitApplicationParams, UpdateCriteriaParams, VisitResponse,
};

#[derive(Clone)]
pub struct DirectoryServer {
    store: Arc<RecordStore>,
    fields: SearchFields,
    render_config: RenderConfig,
    live: LiveDirectory,
    visits: Arc<VisitTracker>,
    tool_router: ToolRouter<DirectoryServer>,
}

impl DirectoryServer {
    pub fn new(
        store: Arc<RecordStore>,
        fields: SearchFields,
        render_config: RenderConfig,
        live: LiveDirectory,
        visits: Arc<VisitTracker>,
    ) -> Self {
        Self {
            store,
            fields,
            render_config,
            live,
            visits,
            tool_router: Self::tool_router(),
        }
    }

    fn render(&self, criteria: Criteria) -> RenderedView {
        let controller = DirectoryController::with_criteria(
            Arc::clone(&self.store),
            criteria,
            self.fields,
            ViewSurface::default(),
            self.render_config.clone(),
        );
        controller.surface().snapshot().clone()
    }
}

#[tool_router]
impl DirectoryServer {
    #[tool(description = "Search the chamber member directory. Filters by category and membership tier (or 'all'), matches a free-text query against name, description and category, and sorts by 'name-asc', 'name-desc', 'newest' or 'oldest'.")]
    async fn search_directory(
        &self,
        Parameters(params): Parameters<SearchDirectoryParams>,
    ) -> Result<Json<DirectoryViewResponse>, String> {
        let criteria = Criteria::from_params(
            params.category.as_deref(),
            params.tier.as_deref(),
            params.query.as_deref(),
            params.sort.as_deref(),
        );
        let view = self.render(criteria.clone());
        info!(
            category = %criteria.category,
            tier = %criteria.tier,
            query = %criteria.query,
            count = view.cards.len(),
            "directory search"
        );
        Ok(Json(to_view_response(&criteria, &view)))
    }

    #[tool(description = "Change one criterion ('category', 'tier', 'query' or 'sort') of the shared live directory view and return the re-rendered view. Rapid query changes are coalesced; each caller receives the first render that includes its change.")]
    async fn update_directory_criteria(
        &self,
        Parameters(params): Parameters<UpdateCriteriaParams>,
    ) -> Result<Json<DirectoryViewResponse>, String> {
        let change = CriteriaChange::parse(&params.field, &params.value).map_err(|e| e.to_string())?;
        let published = self
            .live
            .update(change)
            .await
            .map_err(|e| format!("update failed: {e}"))?;
        info!(
            generation = published.generation,
            count = published.view.cards.len(),
            "live directory updated"
        );
        Ok(Json(to_view_response(&published.criteria, &published.view)))
    }

    #[tool(description = "Return the shared live directory view as last rendered, without changing it.")]
    async fn get_directory_view(&self) -> Result<Json<DirectoryViewResponse>, String> {
        let published = self.live.current();
        Ok(Json(to_view_response(&published.criteria, &published.view)))
    }

    #[tool(description = "List directory categories with member counts. The first entry, 'All', counts every member.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        let categories = self
            .store
            .categories()
            .into_iter()
            .map(|c| CategoryInfo {
                name: c.name,
                member_count: c.member_count,
            })
            .collect();
        Ok(Json(CategoryListResponse {
            categories,
            total_members: self.store.len(),
            from_fallback: self.store.is_fallback(),
        }))
    }

    #[tool(description = "Get a single directory member by ID.")]
    async fn get_member(
        &self,
        Parameters(params): Parameters<GetMemberParams>,
    ) -> Result<Json<MemberDetailResponse>, String> {
        let member_id = params.member_id.trim().to_string();
        if member_id.is_empty() {
            return Err("member_id must not be empty".to_string());
        }

        let record = self
            .store
            .get(&member_id)
            .ok_or_else(|| AppError::NotFound(member_id.clone()).to_string())?;
        let card = Card::from_record(record, &self.render_config.tier_labels);
        Ok(Json(MemberDetailResponse {
            member: to_api_card(&card),
            established: record.established,
        }))
    }

    #[tool(description = "Pick random gold-member spotlights for the home page (default: 3, max: 10).")]
    async fn get_spotlights(
        &self,
        Parameters(params): Parameters<SpotlightParams>,
    ) -> Result<Json<SpotlightResponse>, String> {
        let count = params
            .count
            .map(|c| c as usize)
            .unwrap_or(DEFAULT_SPOTLIGHTS);
        let picked = pick_spotlights(&self.store, count, &mut rand::rng());
        let spotlights = picked
            .members
            .into_iter()
            .map(|m| SpotlightCard {
                id: m.id.to_string(),
                name: m.name,
                description: m.description,
                image: m.image,
                website: m.website,
            })
            .collect();
        Ok(Json(SpotlightResponse {
            spotlights,
            from_fallback: picked.from_fallback,
        }))
    }

    #[tool(description = "Record a visit and return the welcome message based on the visitor's previous visit.")]
    async fn record_visit(
        &self,
        Parameters(params): Parameters<RecordVisitParams>,
    ) -> Result<Json<VisitResponse>, String> {
        let visitor_id = params.visitor_id.trim().to_string();
        if visitor_id.is_empty() {
            return Err("visitor_id must not be empty".to_string());
        }

        let outcome = self.visits.record(&visitor_id, now_ms()).await;
        Ok(Json(VisitResponse {
            message: outcome.message,
            days_since: outcome.days_since,
            persisted: outcome.persisted,
        }))
    }

    #[tool(description = "Validate a membership application and return the confirmation details, with the phone number formatted and the membership level labelled.")]
    async fn submit_application(
        &self,
        Parameters(params): Parameters<SubmitApplicationParams>,
    ) -> Result<Json<ApplicationResponse>, String> {
        let application = Application {
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone: params.phone,
            org_name: params.org_name,
            membership: params.membership,
            description: params.description.unwrap_or_default(),
        };
        let confirmation = application
            .validate(&chrono::Local::now())
            .map_err(|e| e.to_string())?;
        info!(org = %confirmation.org_name, membership = %confirmation.membership, "membership application accepted");

        Ok(Json(ApplicationResponse {
            first_name: confirmation.first_name,
            last_name: confirmation.last_name,
            email: confirmation.email,
            phone: confirmation.phone,
            org_name: confirmation.org_name,
            membership: confirmation.membership,
            description_count: confirmation.description_count.text(),
            description_near_limit: confirmation.description_count.near_limit(),
            submitted_at: confirmation.submitted_at,
        }))
    }
}

fn to_api_card(card: &Card) -> MemberCard {
    MemberCard {
        id: card.id.to_string(),
        name: card.name.clone(),
        category: card.category.clone(),
        tier: card.tier.to_string(),
        badge: card.badge.as_ref().map(|b| b.label.clone()),
        description: card.description.clone(),
        address: card.address.clone(),
        phone: card.phone.clone(),
        phone_href: card.phone_href.clone(),
        website: card.website.clone(),
        image: card.image.clone(),
    }
}

fn to_view_response(criteria: &Criteria, view: &RenderedView) -> DirectoryViewResponse {
    DirectoryViewResponse {
        criteria: CriteriaSummary {
            category: criteria.category.to_string(),
            tier: criteria.tier.to_string(),
            query: criteria.query.clone(),
            sort: criteria.sort.as_str().to_string(),
        },
        count_text: view.count_text.clone(),
        empty_state_visible: view.empty_state_visible,
        results_visible: view.results_visible,
        notice: view.notice.clone(),
        cards: view.cards.iter().map(to_api_card).collect(),
    }
}

#[tool_handler]
impl ServerHandler for DirectoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "chamber-directory".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Chamber of commerce member directory. Use search_directory to filter and \
                 sort members, update_directory_criteria to drive the shared live view one \
                 criterion at a time, list_categories and get_member for browsing, \
                 get_directory_view to read it back, get_spotlights for featured gold members, record_visit for the returning \
                 visitor message, and submit_application to check a membership application."
                    .to_string(),
            ),
        }
    }
}
