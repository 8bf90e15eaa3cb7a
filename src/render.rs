//! View models for the results grid.
//!
//! Rendering is a pure function of the filtered domain list and the current
//! page, so the GUI only has to lay out what it is given.

use crate::controller::UiState;
use crate::opener::visit_url;
use std::time::Duration;

pub const NO_MATCH_PLACEHOLDER: &str = "No domains match your filter criteria.";
pub const ENTRANCE_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardViewModel {
    pub domain: String,
    pub visit_url: String,
    /// Position within the page, drives the staggered fade-in.
    pub slot: usize,
    pub entrance_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub cards: Vec<CardViewModel>,
    pub placeholder: Option<&'static str>,
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageView {
    pub fn page_indicator(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Copy(String),
    Visit(String),
}

pub fn render(state: &UiState) -> PageView {
    let total_pages = state.total_pages();
    let current_page = state.current_page;

    let cards: Vec<CardViewModel> = state
        .page_slice()
        .iter()
        .enumerate()
        .map(|(slot, domain)| CardViewModel {
            domain: domain.clone(),
            visit_url: visit_url(domain),
            slot,
            entrance_delay: ENTRANCE_STEP * slot as u32,
        })
        .collect();

    let placeholder = if state.filtered_domains.is_empty() {
        Some(NO_MATCH_PLACEHOLDER)
    } else {
        None
    };

    PageView {
        cards,
        placeholder,
        current_page,
        total_pages,
        prev_enabled: current_page > 1,
        next_enabled: current_page < total_pages,
    }
}

/// Copy and visit buttons sit on top of the card; a click on either must not
/// also count as a click on the card itself.
pub fn resolve_card_click(
    card: &CardViewModel,
    copy_clicked: bool,
    visit_clicked: bool,
    card_clicked: bool,
) -> Option<CardAction> {
    if copy_clicked {
        Some(CardAction::Copy(card.domain.clone()))
    } else if visit_clicked || card_clicked {
        Some(CardAction::Visit(card.domain.clone()))
    } else {
        None
    }
}

/// Thousands-separated count, e.g. `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PAGE_SIZE;

    fn state_with(n: usize) -> UiState {
        let mut state = UiState::default();
        state.replace((0..n).map(|i| format!("d{i}.example.com")).collect());
        state
    }

    #[test]
    fn first_page_of_35() {
        let view = render(&state_with(35));
        assert_eq!(view.cards.len(), PAGE_SIZE);
        assert_eq!(view.page_indicator(), "Page 1 of 2");
        assert!(!view.prev_enabled);
        assert!(view.next_enabled);
        assert_eq!(view.placeholder, None);
        assert_eq!(view.cards[0].domain, "d0.example.com");
        assert_eq!(view.cards[0].visit_url, "https://d0.example.com");
    }

    #[test]
    fn last_page_holds_remainder() {
        let mut state = state_with(35);
        assert!(state.next_page());
        let view = render(&state);
        assert_eq!(view.cards.len(), 5);
        assert_eq!(view.cards[0].domain, "d30.example.com");
        assert_eq!(view.page_indicator(), "Page 2 of 2");
        assert!(view.prev_enabled);
        assert!(!view.next_enabled);
    }

    #[test]
    fn empty_filter_result_renders_placeholder() {
        let mut state = state_with(3);
        state.apply_filter("nothing-matches");
        let view = render(&state);
        assert!(view.cards.is_empty());
        assert_eq!(view.placeholder, Some(NO_MATCH_PLACEHOLDER));
        assert!(!view.prev_enabled);
        assert!(!view.next_enabled);
        assert_eq!(view.page_indicator(), "Page 1 of 1");
    }

    #[test]
    fn entrance_delay_grows_per_slot() {
        let view = render(&state_with(3));
        let delays: Vec<_> = view.cards.iter().map(|c| c.entrance_delay).collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_millis(50),
                Duration::from_millis(100)
            ]
        );
    }

    #[test]
    fn pages_concatenate_back_to_input() {
        for n in [1, 29, 30, 31, 60, 61, 95] {
            let mut state = state_with(n);
            let mut seen = Vec::new();
            loop {
                seen.extend(render(&state).cards.into_iter().map(|c| c.domain));
                if !state.next_page() {
                    break;
                }
            }
            assert_eq!(seen, state.all_domains, "n = {n}");
        }
    }

    #[test]
    fn button_clicks_do_not_reach_card() {
        let card = render(&state_with(1)).cards.remove(0);
        assert_eq!(
            resolve_card_click(&card, true, false, true),
            Some(CardAction::Copy("d0.example.com".into()))
        );
        assert_eq!(
            resolve_card_click(&card, false, true, true),
            Some(CardAction::Visit("d0.example.com".into()))
        );
        assert_eq!(
            resolve_card_click(&card, false, false, true),
            Some(CardAction::Visit("d0.example.com".into()))
        );
        assert_eq!(resolve_card_click(&card, false, false, false), None);
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(35), "35");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
