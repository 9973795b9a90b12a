//! Fire-and-forget usage events.

use serde::Serialize;
use std::cell::RefCell;

/// Events reported to the optional analytics beacon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    GroupSelected { group: String },
    MemberSelected { group: String, member: String },
    MemberDeselected { group: String, member: String },
    Copy,
    Post,
}

impl AnalyticsEvent {
    /// Event name as sent on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GroupSelected { .. } => "group_selected",
            Self::MemberSelected { .. } => "member_selected",
            Self::MemberDeselected { .. } => "member_deselected",
            Self::Copy => "copy",
            Self::Post => "post",
        }
    }
}

/// Receiver for analytics events. Implementations swallow their own failures.
pub trait AnalyticsSink {
    fn send(&self, event: &AnalyticsEvent);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn send(&self, event: &AnalyticsEvent) {
        tracing::trace!(event = event.name(), "analytics disabled; dropping event");
    }
}

/// Sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }
}

impl AnalyticsSink for RecordingSink {
    fn send(&self, event: &AnalyticsEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

impl<T: AnalyticsSink + ?Sized> AnalyticsSink for &T {
    fn send(&self, event: &AnalyticsEvent) {
        (**self).send(event);
    }
}

impl<T: AnalyticsSink + ?Sized> AnalyticsSink for Box<T> {
    fn send(&self, event: &AnalyticsEvent) {
        (**self).send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = AnalyticsEvent::MemberSelected {
            group: "イコラブ".into(),
            member: "大谷 映美里".into(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "member_selected");
        assert_eq!(json["group"], "イコラブ");
        assert_eq!(json["member"], "大谷 映美里");
        assert_eq!(event.name(), "member_selected");

        let json = serde_json::to_value(AnalyticsEvent::Copy).expect("serialize");
        assert_eq!(json["event"], "copy");
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.send(&AnalyticsEvent::Copy);
        sink.send(&AnalyticsEvent::Post);
        assert_eq!(sink.events(), [AnalyticsEvent::Copy, AnalyticsEvent::Post]);
    }
}
