// View model derived from a fetched guest collection.

use serde::Serialize;

use crate::domain::{GuestRecord, GuestStatus, NAME_PLACEHOLDER};

const CONFIRM_LABEL: &str = "Confirmar";
const CONFIRMED_BUTTON_LABEL: &str = "Confirmado ✓";

/// Which part of the list screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Loading,
    Ready,
    Empty,
    Error,
}

/// The single action a rendered row offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmAction {
    pub label: &'static str,
    pub enabled: bool,
}

/// One rendered guest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestEntry {
    pub name: String,
    pub status: String,
    pub status_class: String,
    pub photo: Option<String>,
    pub confirm: ConfirmAction,
}

impl GuestEntry {
    pub fn can_confirm(&self) -> bool {
        self.confirm.enabled
    }
}

/// Latest rendered snapshot of the list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestListView {
    pub phase: ViewPhase,
    pub guests: Vec<GuestEntry>,
}

impl GuestListView {
    pub fn loading() -> Self {
        Self {
            phase: ViewPhase::Loading,
            guests: Vec::new(),
        }
    }

    /// Builds a fresh view from a fetched collection, keeping server order.
    pub fn from_records(records: &[GuestRecord]) -> Self {
        let guests: Vec<GuestEntry> = records.iter().filter_map(entry_for).collect();
        let phase = if guests.is_empty() {
            ViewPhase::Empty
        } else {
            ViewPhase::Ready
        };
        Self { phase, guests }
    }

    pub fn find(&self, name: &str) -> Option<&GuestEntry> {
        self.guests.iter().find(|entry| entry.name == name)
    }
}

/// Maps one record to a row, or `None` for rows without a usable name.
pub fn entry_for(record: &GuestRecord) -> Option<GuestEntry> {
    let name = record
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(NAME_PLACEHOLDER);
    if name == NAME_PLACEHOLDER {
        return None;
    }

    let status = record.status.clone().unwrap_or_default();
    let confirmed = status.is_confirmed();

    Some(GuestEntry {
        name: name.to_string(),
        status_class: status_class(&status),
        status: status.label().to_string(),
        photo: record.photo.clone().filter(|photo| !photo.is_empty()),
        confirm: ConfirmAction {
            label: if confirmed {
                CONFIRMED_BUTTON_LABEL
            } else {
                CONFIRM_LABEL
            },
            enabled: !confirmed,
        },
    })
}

/// Style class for a status badge: lowercased, whitespace runs become `-`.
pub fn status_class(status: &GuestStatus) -> String {
    status
        .label()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
