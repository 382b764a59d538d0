/// Projection of a derived view onto a display surface.
///
/// The renderer never looks anything up: the surface handles it writes to are
/// injected through [`DisplaySurface`], so it runs the same against an
/// in-memory snapshot, an HTML page or a test double.
use std::collections::HashMap;

use crate::model::{Record, RecordId, Tier};

/// Named display handles the renderer drives.
pub trait DisplaySurface {
    fn set_count_text(&mut self, text: &str);
    fn set_empty_state_visible(&mut self, visible: bool);
    fn set_results_visible(&mut self, visible: bool);
    /// Replace every card in the results container.
    fn replace_cards(&mut self, cards: Vec<Card>);
    fn set_notice(&mut self, notice: Option<&str>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub tier: Tier,
    pub label: String,
}

/// One display unit per visible record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub tier: Tier,
    pub badge: Option<Badge>,
    pub description: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub phone_href: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
}

impl Card {
    pub fn from_record(record: &Record, labels: &TierLabels) -> Self {
        let phone_href = record
            .phone
            .as_deref()
            .map(|p| p.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|digits| !digits.is_empty());

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            tier: record.tier.clone(),
            badge: labels.badge(&record.tier),
            description: record.description.clone(),
            address: record.address.clone(),
            phone: record.phone.clone(),
            phone_href,
            website: record.website.clone(),
            image: record.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLabels(HashMap<Tier, String>);

impl TierLabels {
    pub fn new(entries: impl IntoIterator<Item = (Tier, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn label(&self, tier: &Tier) -> Option<&str> {
        self.0.get(tier).map(String::as_str)
    }

    pub fn badge(&self, tier: &Tier) -> Option<Badge> {
        self.label(tier).map(|label| Badge {
            tier: tier.clone(),
            label: label.to_string(),
        })
    }
}

impl Default for TierLabels {
    /// Directory badges. Bronze members carry no badge.
    fn default() -> Self {
        Self::new([
            (Tier::Gold, "Gold Member".to_string()),
            (Tier::Silver, "Silver Member".to_string()),
            (Tier::Nonprofit, "Nonprofit".to_string()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountNoun {
    pub singular: String,
    pub plural: String,
}

impl Default for CountNoun {
    fn default() -> Self {
        Self {
            singular: "business".to_string(),
            plural: "businesses".to_string(),
        }
    }
}

impl CountNoun {
    pub fn count_text(&self, n: usize) -> String {
        if n == 1 {
            format!("1 {} found", self.singular)
        } else {
            format!("{n} {} found", self.plural)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub tier_labels: TierLabels,
    pub noun: CountNoun,
    /// Shown next to the empty state, e.g. when the store holds fallback data.
    pub empty_notice: Option<String>,
}

pub struct Renderer<S> {
    surface: S,
    config: RenderConfig,
}

impl<S: DisplaySurface> Renderer<S> {
    pub fn new(surface: S, config: RenderConfig) -> Self {
        Self { surface, config }
    }

    pub fn render(&mut self, view: &[&Record]) {
        self.surface
            .set_count_text(&self.config.noun.count_text(view.len()));

        if view.is_empty() {
            self.surface.set_results_visible(false);
            self.surface.replace_cards(Vec::new());
            self.surface.set_empty_state_visible(true);
            self.surface.set_notice(self.config.empty_notice.as_deref());
            return;
        }

        let cards = view
            .iter()
            .map(|r| Card::from_record(r, &self.config.tier_labels))
            .collect();
        self.surface.set_empty_state_visible(false);
        self.surface.set_notice(None);
        self.surface.set_results_visible(true);
        self.surface.replace_cards(cards);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Everything a surface currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    pub count_text: String,
    pub empty_state_visible: bool,
    pub results_visible: bool,
    pub notice: Option<String>,
    pub cards: Vec<Card>,
}

/// In-memory surface; its state can be cloned out and published.
#[derive(Debug, Clone, Default)]
pub struct ViewSurface {
    view: RenderedView,
}

impl ViewSurface {
    pub fn snapshot(&self) -> &RenderedView {
        &self.view
    }
}

impl DisplaySurface for ViewSurface {
    fn set_count_text(&mut self, text: &str) {
        self.view.count_text = text.to_string();
    }

    fn set_empty_state_visible(&mut self, visible: bool) {
        self.view.empty_state_visible = visible;
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.view.results_visible = visible;
    }

    fn replace_cards(&mut self, cards: Vec<Card>) {
        self.view.cards = cards;
    }

    fn set_notice(&mut self, notice: Option<&str>) {
        self.view.notice = notice.map(str::to_string);
    }
}
