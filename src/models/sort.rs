// Sort configuration models

use serde::Serialize;

/// Column the container table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Cpu,
    Memory,
    NetworkIo,
    BlockIo,
    ImageSize,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::Cpu,
        SortField::Memory,
        SortField::NetworkIo,
        SortField::BlockIo,
        SortField::ImageSize,
    ];

    /// Parse a user-supplied field name. Returns None for unknown names.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(SortField::Name),
            "cpu" => Some(SortField::Cpu),
            "mem" | "memory" => Some(SortField::Memory),
            "net" | "network" | "netio" => Some(SortField::NetworkIo),
            "disk" | "block" | "blockio" => Some(SortField::BlockIo),
            "img" | "image" | "imagesize" => Some(SortField::ImageSize),
            _ => None,
        }
    }

    /// Name sorts A→Z by default; every numeric column shows biggest first.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::Name => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// Short label used in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "NAME",
            SortField::Cpu => "CPU",
            SortField::Memory => "MEM",
            SortField::NetworkIo => "NET",
            SortField::BlockIo => "DISK",
            SortField::ImageSize => "IMG",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active (field, direction) pair. Persists across polling cycles and only
/// changes on an explicit sort command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::for_field(SortField::Cpu)
    }
}

impl SortSpec {
    pub fn for_field(field: SortField) -> Self {
        SortSpec {
            field,
            direction: field.default_direction(),
        }
    }

    /// Resolve a configured field name; unknown names fall back to Name ascending.
    pub fn from_name(s: &str) -> Self {
        SortField::from_name(s)
            .map(SortSpec::for_field)
            .unwrap_or(SortSpec {
                field: SortField::Name,
                direction: SortDirection::Ascending,
            })
    }

    /// Apply a sort-by command: same field flips direction, a new field
    /// resets to that field's default direction.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            SortSpec {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortSpec::for_field(field)
        }
    }
}
