use std::sync::Arc;

use tracing::debug;

use crate::engine::{derive_view, Criteria, CriteriaChange, Filter, SearchFields, SortKey};
use crate::render::{DisplaySurface, RenderConfig, Renderer};
use crate::store::RecordStore;

pub const FALLBACK_NOTICE: &str =
    "Unable to load the full directory. Please try refreshing the page.";

/// Owns the criteria for one directory view and reruns the pipeline on every change.
///
/// A controller can only be built from a loaded store, so nothing is ever rendered
/// before the data is in.
pub struct DirectoryController<S> {
    store: Arc<RecordStore>,
    criteria: Criteria,
    fields: SearchFields,
    renderer: Renderer<S>,
}

impl<S: DisplaySurface> DirectoryController<S> {
    pub fn new(store: Arc<RecordStore>, fields: SearchFields, surface: S, config: RenderConfig) -> Self {
        Self::with_criteria(store, Criteria::default(), fields, surface, config)
    }

    /// Start from `criteria` instead of the defaults. Renders immediately.
    pub fn with_criteria(
        store: Arc<RecordStore>,
        criteria: Criteria,
        fields: SearchFields,
        surface: S,
        mut config: RenderConfig,
    ) -> Self {
        if store.is_fallback() && config.empty_notice.is_none() {
            config.empty_notice = Some(FALLBACK_NOTICE.to_string());
        }
        let mut controller = Self {
            store,
            criteria,
            fields,
            renderer: Renderer::new(surface, config),
        };
        controller.refresh();
        controller
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    /// Update one criterion without re-rendering.
    pub fn stage(&mut self, change: CriteriaChange) {
        self.criteria.apply(change);
    }

    pub fn apply(&mut self, change: CriteriaChange) -> usize {
        match change {
            CriteriaChange::Category(raw) => self.set_category(&raw),
            CriteriaChange::Tier(raw) => self.set_tier(&raw),
            CriteriaChange::Query(raw) => self.set_query(&raw),
            CriteriaChange::Sort(raw) => self.set_sort(&raw),
        }
    }

    pub fn set_category(&mut self, category: &str) -> usize {
        self.criteria.category = Filter::category(category);
        self.refresh()
    }

    pub fn set_tier(&mut self, tier: &str) -> usize {
        self.criteria.tier = Filter::tier(tier);
        self.refresh()
    }

    pub fn set_query(&mut self, query: &str) -> usize {
        self.criteria.query = query.trim().to_string();
        self.refresh()
    }

    pub fn set_sort(&mut self, sort: &str) -> usize {
        self.criteria.sort = SortKey::parse(sort);
        self.refresh()
    }

    /// Recompute the view from the full store and render it. Returns the number
    /// of visible records.
    pub fn refresh(&mut self) -> usize {
        let view = derive_view(self.store.records(), &self.criteria, &self.fields);
        debug!(
            category = %self.criteria.category,
            tier = %self.criteria.tier,
            query = %self.criteria.query,
            sort = self.criteria.sort.as_str(),
            visible = view.len(),
            "directory view recomputed"
        );
        self.renderer.render(&view);
        view.len()
    }
}
