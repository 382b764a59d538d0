/// HTML markup for a rendered directory view.
use std::fmt::Write;

use crate::render::{Card, RenderedView};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only web, site-relative and fragment links are emitted as hrefs.
fn is_safe_link(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    ["http://", "https://", "/", "#"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

pub fn directory_page(view: &RenderedView) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Member Directory</title></head>\n<body>\n<main class=\"directory\">\n");
    html.push_str(&directory_section(view));
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

pub fn directory_section(view: &RenderedView) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<p id=\"results-count\" class=\"results-count\">{}</p>",
        escape(&view.count_text)
    );

    let hidden = |visible: bool| if visible { "" } else { " hidden" };
    let _ = writeln!(
        html,
        "<div id=\"no-results\" class=\"no-results\"{}>\n<h3>No businesses found</h3>",
        hidden(view.empty_state_visible)
    );
    if let Some(notice) = &view.notice {
        let _ = writeln!(html, "<p>{}</p>", escape(notice));
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<div id=\"business-grid\" class=\"business-grid\"{}>",
        hidden(view.results_visible)
    );
    for card in &view.cards {
        html.push_str(&business_card(card));
    }
    html.push_str("</div>\n");
    html
}

fn business_card(card: &Card) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<article class=\"card business-card\" data-id=\"{}\">",
        escape(&card.id.to_string())
    );
    html.push_str("<div class=\"card-header\">\n");
    if let Some(image) = &card.image {
        let _ = writeln!(
            html,
            "<img src=\"{}\" alt=\"{} logo\" class=\"business-logo\" loading=\"lazy\">",
            escape(image),
            escape(&card.name)
        );
    }
    let _ = writeln!(
        html,
        "<div class=\"business-info\">\n<h3>{}</h3>\n<span class=\"business-category\">{}</span>",
        escape(&card.name),
        escape(&card.category)
    );
    if let Some(badge) = &card.badge {
        let _ = writeln!(
            html,
            "<span class=\"membership-badge {}\">{}</span>",
            escape(badge.tier.as_str()),
            escape(&badge.label)
        );
    }
    html.push_str("</div>\n</div>\n<div class=\"card-body\">\n");
    let _ = writeln!(html, "<p class=\"card-text\">{}</p>", escape(&card.description));

    let mut details = String::new();
    if let Some(address) = &card.address {
        let _ = writeln!(details, "<span class=\"address\">{}</span>", escape(address));
    }
    if let Some(phone) = &card.phone {
        match &card.phone_href {
            Some(href) => {
                let _ = writeln!(
                    details,
                    "<span class=\"phone\"><a href=\"tel:{}\">{}</a></span>",
                    escape(href),
                    escape(phone)
                );
            }
            None => {
                let _ = writeln!(details, "<span class=\"phone\">{}</span>", escape(phone));
            }
        }
    }
    if let Some(website) = card.website.as_deref().filter(|url| is_safe_link(url)) {
        let _ = writeln!(
            details,
            "<span class=\"website\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Visit Website</a></span>",
            escape(website)
        );
    }
    if !details.is_empty() {
        html.push_str("<div class=\"business-details\">\n");
        html.push_str(&details);
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</article>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordId, Tier};
    use crate::render::Badge;

    fn card() -> Card {
        Card {
            id: RecordId::Number(3),
            name: "Joe's <Diner>".to_string(),
            category: "Dining".to_string(),
            tier: Tier::Gold,
            badge: Some(Badge {
                tier: Tier::Gold,
                label: "Gold Member".to_string(),
            }),
            description: "Burgers & shakes".to_string(),
            address: None,
            phone: Some("(480) 555-0100".to_string()),
            phone_href: Some("4805550100".to_string()),
            website: None,
            image: None,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn card_markup_omits_absent_fields() {
        let html = business_card(&card());
        assert!(html.contains("Joe&#39;s &lt;Diner&gt;"));
        assert!(html.contains("membership-badge gold"));
        assert!(html.contains("tel:4805550100"));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("address"));
        assert!(!html.contains("Visit Website"));
    }

    #[test]
    fn website_links_need_a_web_scheme() {
        let linked = Card {
            website: Some("https://joes.example".to_string()),
            ..card()
        };
        assert!(business_card(&linked).contains("href=\"https://joes.example\""));

        for url in ["javascript:alert(1)", " JavaScript:alert(1)", "data:text/html,hi"] {
            let html = business_card(&Card {
                website: Some(url.to_string()),
                ..card()
            });
            assert!(!html.contains("Visit Website"), "{url}");
            assert!(!html.to_ascii_lowercase().contains("javascript"), "{url}");
        }
        assert!(is_safe_link("#"));
        assert!(is_safe_link("/members/3"));
    }

    #[test]
    fn section_hides_grid_on_empty_view() {
        let view = RenderedView {
            count_text: "0 businesses found".to_string(),
            empty_state_visible: true,
            results_visible: false,
            notice: None,
            cards: Vec::new(),
        };
        let html = directory_section(&view);
        assert!(html.contains("<div id=\"business-grid\" class=\"business-grid\" hidden>"));
        assert!(html.contains("<div id=\"no-results\" class=\"no-results\">"));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn page_lists_every_card() {
        let view = RenderedView {
            count_text: "2 businesses found".to_string(),
            empty_state_visible: false,
            results_visible: true,
            notice: None,
            cards: vec![card(), card()],
        };
        let html = directory_page(&view);
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains("<div id=\"no-results\" class=\"no-results\" hidden>"));
    }
}
