use std::fmt::Display;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::constants::{CURRENT_LAYOUT_MONTH, CURRENT_LAYOUT_YEAR};
use super::error::LayoutError;

/// Names of the fields found in a raw CAEN record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    TimeHigh,
    TimeLow,
    Unused16,
    Group,
    IdFlags,
    FlagsOm,
    AmplitudeA,
    AmplitudeB,
    AmplitudeC,
    AmplitudeD,
}

/// Width of an unsigned little-endian field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
}

impl FieldWidth {
    pub const fn bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: FieldName,
    pub width: FieldWidth,
}

const fn field(name: FieldName, width: FieldWidth) -> Field {
    Field { name, width }
}

// struct raw_data_t {
//   uint32_t TimeHi;
//   uint32_t TimeLo;
//   uint16_t unused16;
//   uint8_t  TubeCh;
//   uint8_t  IDnFlags;
//   uint16_t AmplA..AmplD;
// } __attribute__((__packed__));
const LEGACY_FIELDS: [Field; 9] = [
    field(FieldName::TimeHigh, FieldWidth::U32),
    field(FieldName::TimeLow, FieldWidth::U32),
    field(FieldName::Unused16, FieldWidth::U16),
    field(FieldName::Group, FieldWidth::U8),
    field(FieldName::IdFlags, FieldWidth::U8),
    field(FieldName::AmplitudeA, FieldWidth::U16),
    field(FieldName::AmplitudeB, FieldWidth::U16),
    field(FieldName::AmplitudeC, FieldWidth::U16),
    field(FieldName::AmplitudeD, FieldWidth::U16),
];

// Firmware from October 2024 moved the flags in front of the group byte
const CURRENT_FIELDS: [Field; 9] = [
    field(FieldName::TimeHigh, FieldWidth::U32),
    field(FieldName::TimeLow, FieldWidth::U32),
    field(FieldName::FlagsOm, FieldWidth::U8),
    field(FieldName::Group, FieldWidth::U8),
    field(FieldName::Unused16, FieldWidth::U16),
    field(FieldName::AmplitudeA, FieldWidth::U16),
    field(FieldName::AmplitudeB, FieldWidth::U16),
    field(FieldName::AmplitudeC, FieldWidth::U16),
    field(FieldName::AmplitudeD, FieldWidth::U16),
];

/// The two known byte layouts of a CAEN record.
///
/// A layout is picked once per file by [`resolve_layout`] and then drives the decoding
/// of every record in that file through its field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    Legacy,
    Current,
}

impl Display for RecordLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Current => write!(f, "current"),
        }
    }
}

impl RecordLayout {
    /// Select the layout in effect for data produced on the given date.
    ///
    /// Anything before October 2024 is legacy.
    pub fn for_date(date: Date) -> Self {
        if (date.year(), u8::from(date.month())) < (CURRENT_LAYOUT_YEAR, CURRENT_LAYOUT_MONTH) {
            Self::Legacy
        } else {
            Self::Current
        }
    }

    /// The ordered field table of this layout
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Legacy => &LEGACY_FIELDS,
            Self::Current => &CURRENT_FIELDS,
        }
    }

    /// Total size of one record in bytes
    pub fn record_size(&self) -> usize {
        self.fields().iter().map(|f| f.width.bytes()).sum()
    }

    /// Byte offset of a field within the record, if this layout has it
    pub fn offset_of(&self, name: FieldName) -> Option<usize> {
        let mut offset = 0;
        for f in self.fields() {
            if f.name == name {
                return Some(offset);
            }
            offset += f.width.bytes();
        }
        None
    }
}

/// Parse a pivot given as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub fn parse_pivot(value: &str) -> Result<Date, LayoutError> {
    let value = value.trim();
    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|datetime| datetime.date())
        .map_err(|_| LayoutError::InvalidPivot(value.to_string()))
}

/// Get the date a file was created.
///
/// Not every filesystem records a creation time. When it is unavailable we use today,
/// which means such files are read with the current layout unless a pivot is given.
fn creation_date(path: &Path) -> Date {
    match std::fs::metadata(path).and_then(|meta| meta.created()) {
        Ok(created) => OffsetDateTime::from(created).date(),
        Err(e) => {
            log::debug!(
                "No creation time for {}, pivoting on today: {e}",
                path.to_string_lossy()
            );
            OffsetDateTime::now_utc().date()
        }
    }
}

/// Pick the record layout for a file.
///
/// An explicit pivot takes priority over the creation time of the file.
pub fn resolve_layout(path: &Path, pivot: Option<Date>) -> RecordLayout {
    let date = pivot.unwrap_or_else(|| creation_date(path));
    let layout = RecordLayout::for_date(date);
    log::info!(
        "Using {layout} record layout for {} (pivot {date})",
        path.to_string_lossy()
    );
    layout
}
