use crate::client::{SearchError, SearchResponse};
use crate::clipboard::ClipboardSink;
use crate::export::{self, ExportError, ExportPlan};
use crate::notify::{Notifier, Severity};
use crate::render::{self, format_count, PageView};
use chrono::NaiveDate;
use log::{debug, error, info, warn};

pub const PAGE_SIZE: usize = 30;
pub const GENERIC_ERROR: &str = "An error occurred while fetching domains.";

#[derive(Debug, Clone)]
pub struct UiState {
    pub all_domains: Vec<String>,
    pub filtered_domains: Vec<String>,
    pub current_page: usize,
    pub filter: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            all_domains: Vec::new(),
            filtered_domains: Vec::new(),
            current_page: 1,
            filter: String::new(),
        }
    }
}

impl UiState {
    pub fn total_pages(&self) -> usize {
        self.filtered_domains.len().div_ceil(PAGE_SIZE)
    }

    /// Replaces the result set and resets the view onto it.
    pub fn replace(&mut self, domains: Vec<String>) {
        self.filtered_domains = domains.clone();
        self.all_domains = domains;
        self.current_page = 1;
        self.filter.clear();
    }

    pub fn apply_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        let needle = filter.to_lowercase();
        self.filtered_domains = if needle.is_empty() {
            self.all_domains.clone()
        } else {
            self.all_domains
                .iter()
                .filter(|domain| domain.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        self.current_page = 1;
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn page_slice(&self) -> &[String] {
        let len = self.filtered_domains.len();
        let start = ((self.current_page.max(1) - 1) * PAGE_SIZE).min(len);
        let end = (start + PAGE_SIZE).min(len);
        &self.filtered_domains[start..end]
    }
}

/// What the result area shows. Exactly one variant is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultArea {
    Idle,
    Loading,
    Results,
    NoResults,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsHeader {
    pub keyword: String,
    pub count: String,
}

/// Stamp for an issued search; only the most recent one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub ticket: SearchTicket,
    pub keyword: String,
}

pub struct SearchController {
    state: UiState,
    area: ResultArea,
    header: Option<ResultsHeader>,
    searched_keyword: String,
    latest_ticket: u64,
    notifier: Notifier,
    generation: u64,
    scroll_requested: bool,
    focus_requested: bool,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        SearchController {
            state: UiState::default(),
            area: ResultArea::Idle,
            header: None,
            searched_keyword: String::new(),
            latest_ticket: 0,
            notifier: Notifier::new(),
            generation: 0,
            scroll_requested: false,
            focus_requested: false,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn area(&self) -> &ResultArea {
        &self.area
    }

    pub fn header(&self) -> Option<&ResultsHeader> {
        self.header.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Bumped whenever the rendered page changes; the GUI restarts the card
    /// entrance animation when it sees a new value.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.area == ResultArea::Loading
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifier.show(message, severity);
    }

    /// Validates the keyword and moves to `Loading`. Returns the request the
    /// caller must dispatch, or `None` when the keyword is blank.
    pub fn begin_search(&mut self, input: &str) -> Option<PendingSearch> {
        let keyword = input.trim();
        if keyword.is_empty() {
            self.notify("Please enter a keyword", Severity::Warning);
            self.focus_requested = true;
            return None;
        }

        self.state = UiState::default();
        self.header = None;
        self.area = ResultArea::Loading;
        self.searched_keyword = keyword.to_string();
        self.latest_ticket += 1;
        self.generation += 1;

        info!("Searching for '{}' (ticket {})", keyword, self.latest_ticket);

        Some(PendingSearch {
            ticket: SearchTicket(self.latest_ticket),
            keyword: keyword.to_string(),
        })
    }

    /// Applies a backend answer. Answers for anything but the latest ticket
    /// are dropped; returns whether the result was applied.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<SearchResponse, SearchError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(
                "Discarding stale response for ticket {} (latest {})",
                ticket.0, self.latest_ticket
            );
            return false;
        }

        match result {
            Ok(response) if response.is_success() => {
                let domains = response.domains.unwrap_or_default();
                if domains.is_empty() {
                    info!("No domains found for '{}'", self.searched_keyword);
                    self.area = ResultArea::NoResults;
                } else {
                    let count = response.count.unwrap_or(domains.len() as u64);
                    let keyword = if response.keyword.is_empty() {
                        self.searched_keyword.clone()
                    } else {
                        response.keyword
                    };
                    info!("Received {} domains for '{}'", domains.len(), keyword);

                    self.header = Some(ResultsHeader {
                        keyword,
                        count: format_count(count),
                    });
                    self.state.replace(domains);
                    self.area = ResultArea::Results;
                    self.scroll_requested = true;
                }
            }
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_ERROR.to_string());
                warn!("Search for '{}' rejected: {}", self.searched_keyword, message);
                self.area = ResultArea::Error(message);
            }
            Err(err) => {
                error!("Search for '{}' failed: {}", self.searched_keyword, err);
                let message = err.to_string();
                self.area = ResultArea::Error(if message.trim().is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    message
                });
            }
        }

        self.generation += 1;
        true
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.state.apply_filter(filter);
        self.generation += 1;
        debug!(
            "Filter '{}' keeps {}/{} domains",
            filter,
            self.state.filtered_domains.len(),
            self.state.all_domains.len()
        );
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.state.prev_page();
        if moved {
            self.generation += 1;
            self.scroll_requested = true;
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.state.next_page();
        if moved {
            self.generation += 1;
            self.scroll_requested = true;
        }
        moved
    }

    pub fn render(&self) -> PageView {
        render::render(&self.state)
    }

    pub fn copy_domain(&mut self, domain: &str, clipboard: &mut dyn ClipboardSink) {
        match clipboard.write_text(domain) {
            Ok(()) => self.notify(format!("Copied {} to clipboard", domain), Severity::Success),
            Err(e) => {
                error!("Failed to copy {}: {}", domain, e);
                self.notify("Failed to copy to clipboard", Severity::Error);
            }
        }
    }

    pub fn copy_all(&mut self, clipboard: &mut dyn ClipboardSink) {
        let domains = &self.state.filtered_domains;
        if domains.is_empty() {
            self.notify("No domains to copy", Severity::Warning);
            return;
        }

        let count = domains.len();
        match clipboard.write_text(&export::joined(domains)) {
            Ok(()) => self.notify(
                format!("Copied {} domains to clipboard", count),
                Severity::Success,
            ),
            Err(e) => {
                error!("Failed to copy {} domains: {}", count, e);
                self.notify("Failed to copy to clipboard", Severity::Error);
            }
        }
    }

    /// Snapshot for an export. Warns and returns `None` when nothing is shown.
    pub fn prepare_export(&mut self, date: NaiveDate) -> Option<ExportPlan> {
        if self.state.filtered_domains.is_empty() {
            self.notify("No domains to export", Severity::Warning);
            return None;
        }

        Some(ExportPlan {
            file_name: export::export_file_name(date),
            domains: self.state.filtered_domains.clone(),
        })
    }

    pub fn finish_export(&mut self, result: Result<usize, ExportError>) {
        match result {
            Ok(count) => {
                self.notify(format!("Exported {} domains as CSV", count), Severity::Success)
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.notify(format!("Export failed: {}", e), Severity::Error);
            }
        }
    }
}
