use std::fmt;

// Label shown for rows whose name cell is missing; such rows are never rendered.
pub const NAME_PLACEHOLDER: &str = "Sem nome";

pub const PENDING_LABEL: &str = "Pendente";
pub const CONFIRMED_LABEL: &str = "Confirmado";

// RSVP status as stored in the sheet. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuestStatus {
    #[default]
    Pending,
    Confirmed,
    Other(String),
}

impl GuestStatus {
    // Parse a raw cell value. Only an empty cell counts as absent; labels must
    // match exactly, anything else is kept as written.
    pub fn from_cell(value: &str) -> Option<Self> {
        match value {
            "" => None,
            PENDING_LABEL => Some(GuestStatus::Pending),
            CONFIRMED_LABEL => Some(GuestStatus::Confirmed),
            _ => Some(GuestStatus::Other(value.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GuestStatus::Pending => PENDING_LABEL,
            GuestStatus::Confirmed => CONFIRMED_LABEL,
            GuestStatus::Other(label) => label,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, GuestStatus::Confirmed)
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// A row read back from the guest store. Every field may be missing in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestRecord {
    pub name: Option<String>,
    pub status: Option<GuestStatus>,
    pub photo: Option<String>,
}

// Fields sent when creating a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    pub name: String,
    pub status: GuestStatus,
    pub photo: Option<String>,
}

// Partial update keyed by guest name; only the set fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestPatch {
    pub status: Option<GuestStatus>,
    pub photo: Option<String>,
}

impl GuestPatch {
    pub fn confirm() -> Self {
        Self {
            status: Some(GuestStatus::Confirmed),
            photo: None,
        }
    }

    pub fn photo(data_url: String) -> Self {
        Self {
            status: None,
            photo: Some(data_url),
        }
    }
}
