use eframe::egui::Color32;
use std::time::{Duration, Instant};

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn color(self) -> Color32 {
        match self {
            Severity::Success => Color32::from_rgb(16, 185, 129),
            Severity::Warning => Color32::from_rgb(245, 158, 11),
            Severity::Error => Color32::from_rgb(239, 68, 68),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✔",
            Severity::Warning => "⚠",
            Severity::Error => "✖",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// Single-slot toast. A new message replaces the visible one and restarts
/// the dismissal timer.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_at(message, severity, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.current = Some(Notification {
            message: message.into(),
            severity,
            shown_at: now,
        });
    }

    pub fn visible_at(&self, now: Instant) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.shown_at) < NOTIFICATION_TTL)
    }

    pub fn visible(&self) -> Option<&Notification> {
        self.visible_at(Instant::now())
    }

    /// Time left before the visible toast disappears, used to schedule a repaint.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.visible_at(now)
            .map(|n| NOTIFICATION_TTL.saturating_sub(now.saturating_duration_since(n.shown_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_map_to_distinct_styles() {
        let all = [Severity::Success, Severity::Warning, Severity::Error];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.color(), b.color());
                assert_ne!(a.icon(), b.icon());
            }
        }
    }

    #[test]
    fn notification_expires_after_ttl() {
        let mut notifier = Notifier::new();
        let start = Instant::now();
        notifier.show_at("Copied", Severity::Success, start);

        assert!(notifier.visible_at(start).is_some());
        assert!(notifier
            .visible_at(start + NOTIFICATION_TTL - Duration::from_millis(1))
            .is_some());
        assert!(notifier.visible_at(start + NOTIFICATION_TTL).is_none());
    }

    #[test]
    fn newer_message_replaces_and_restarts_timer() {
        let mut notifier = Notifier::new();
        let start = Instant::now();
        notifier.show_at("first", Severity::Success, start);
        notifier.show_at("second", Severity::Error, start + Duration::from_secs(2));

        let at_four = start + Duration::from_secs(4);
        let visible = notifier.visible_at(at_four).expect("second toast still visible");
        assert_eq!(visible.message, "second");
        assert_eq!(visible.severity, Severity::Error);
        assert_eq!(
            notifier.remaining_at(at_four),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn empty_notifier_shows_nothing() {
        let notifier = Notifier::new();
        assert!(notifier.visible().is_none());
        assert!(notifier.remaining_at(Instant::now()).is_none());
    }
}
