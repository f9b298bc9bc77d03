//! Funnel events and the sinks that receive them.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

pub const LEAD_FORM: &str = "lead_form";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    FormStart {
        form_type: String,
        brand_id: String,
    },
    /// `step` is the step just completed (1-based).
    FormStep {
        step: u8,
        form_type: String,
        brand_id: String,
    },
    FormComplete {
        brand_id: String,
        lead_id: uuid::Uuid,
        service_type: String,
    },
    BrandRedirect {
        from: String,
        to: String,
        zip: String,
    },
    PhoneClick {
        phone_number: String,
        source: String,
        brand_id: String,
    },
}

impl AnalyticsEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FormStart { .. } => "form_start",
            Self::FormStep { .. } => "form_step",
            Self::FormComplete { .. } => "form_complete",
            Self::BrandRedirect { .. } => "brand_redirect",
            Self::PhoneClick { .. } => "phone_click",
        }
    }
}

pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Emits every event as a structured `tracing` line under the `analytics`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(target: "analytics", event = event.name(), %payload),
            Err(e) => tracing::warn!(target: "analytics", event = event.name(), error = %e, "unserializable event"),
        }
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(AnalyticsEvent::name).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
