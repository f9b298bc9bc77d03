//! Per-brand persistence of the lead form's in-progress answers.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use leadgate_core::LeadField;
use serde::{Deserialize, Serialize};

/// Key-value storage scoped to one visitor, like browser local storage.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[must_use]
pub fn draft_key(brand_id: &str) -> String {
    format!("leadForm_{brand_id}")
}

/// The six form answers. Absent keys were never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

impl LeadDraft {
    /// A draft carrying a single field.
    #[must_use]
    pub fn with_field(field: LeadField, value: &str) -> Self {
        let mut draft = Self::default();
        if let Some(slot) = draft.slot_mut(field) {
            *slot = Some(value.to_string());
        }
        draft
    }

    #[must_use]
    pub fn get(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::Name => self.name.as_deref(),
            LeadField::Email => self.email.as_deref(),
            LeadField::Phone => self.phone.as_deref(),
            LeadField::ZipCode => self.zip_code.as_deref(),
            LeadField::Address => self.address.as_deref(),
            LeadField::ServiceType => self.service_type.as_deref(),
            LeadField::BrandId => None,
        }
    }

    fn slot_mut(&mut self, field: LeadField) -> Option<&mut Option<String>> {
        match field {
            LeadField::Name => Some(&mut self.name),
            LeadField::Email => Some(&mut self.email),
            LeadField::Phone => Some(&mut self.phone),
            LeadField::ZipCode => Some(&mut self.zip_code),
            LeadField::Address => Some(&mut self.address),
            LeadField::ServiceType => Some(&mut self.service_type),
            LeadField::BrandId => None,
        }
    }

    /// Overlays every key present in `patch`, keeping the rest.
    pub fn merge(&mut self, patch: LeadDraft) {
        for field in FORM_FIELDS {
            if let Some(value) = patch.get(field) {
                if let Some(slot) = self.slot_mut(field) {
                    *slot = Some(value.to_string());
                }
            }
        }
    }
}

/// The fields a visitor fills in, in form order.
pub const FORM_FIELDS: [LeadField; 6] = [
    LeadField::Name,
    LeadField::Email,
    LeadField::Phone,
    LeadField::ZipCode,
    LeadField::Address,
    LeadField::ServiceType,
];

/// Reads the stored draft for `brand_id`. Unreadable drafts count as empty.
#[must_use]
pub fn load_draft(store: &dyn DraftStore, brand_id: &str) -> LeadDraft {
    let Some(raw) = store.get(&draft_key(brand_id)) else {
        return LeadDraft::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(brand_id, error = %e, "discarding unreadable lead form draft");
        LeadDraft::default()
    })
}

/// Merges `patch` into the stored draft for `brand_id`.
pub fn save_draft(store: &dyn DraftStore, brand_id: &str, patch: LeadDraft) {
    let mut draft = load_draft(store, brand_id);
    draft.merge(patch);
    match serde_json::to_string(&draft) {
        Ok(raw) => store.set(&draft_key(brand_id), raw),
        Err(e) => tracing::warn!(brand_id, error = %e, "failed to persist lead form draft"),
    }
}

pub fn clear_draft(store: &dyn DraftStore, brand_id: &str) {
    store.remove(&draft_key(brand_id));
}
