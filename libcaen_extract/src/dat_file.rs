use byteorder::{LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use super::error::DatFileError;
use super::layout::{FieldName, FieldWidth, RecordLayout};

/// What to do with a partial record at the end of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBytes {
    /// Refuse the file
    #[default]
    Fail,
    /// Drop the partial record and keep going
    Discard,
}

/// One raw record from a CAEN .dat file.
///
/// The flag and padding bytes are kept for completeness but nothing downstream uses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub time_high: u32,
    pub time_low: u32,
    pub group: u8,
    pub flags: u8,
    pub padding: u16,
    pub amplitudes: [u16; 4],
}

impl RawRecord {
    /// Concatenate the two time words into a single tick count
    pub fn ticks(&self) -> u64 {
        ((self.time_high as u64) << 32) | self.time_low as u64
    }

    /// Decode a single record from a cursor using the layout's field table
    fn read(cursor: &mut Cursor<&[u8]>, layout: &RecordLayout) -> Result<Self, DatFileError> {
        let mut record = RawRecord::default();
        for field in layout.fields() {
            let value: u32 = match field.width {
                FieldWidth::U8 => cursor.read_u8()? as u32,
                FieldWidth::U16 => cursor.read_u16::<LittleEndian>()? as u32,
                FieldWidth::U32 => cursor.read_u32::<LittleEndian>()?,
            };
            // Widths are fixed by the table, so the narrowing casts below never truncate
            match field.name {
                FieldName::TimeHigh => record.time_high = value,
                FieldName::TimeLow => record.time_low = value,
                FieldName::Unused16 => record.padding = value as u16,
                FieldName::Group => record.group = value as u8,
                FieldName::IdFlags | FieldName::FlagsOm => record.flags = value as u8,
                FieldName::AmplitudeA => record.amplitudes[0] = value as u16,
                FieldName::AmplitudeB => record.amplitudes[1] = value as u16,
                FieldName::AmplitudeC => record.amplitudes[2] = value as u16,
                FieldName::AmplitudeD => record.amplitudes[3] = value as u16,
            }
        }
        Ok(record)
    }
}

/// Decode a buffer of packed records.
///
/// The buffer must hold a whole number of records unless the policy allows discarding
/// the tail.
pub fn decode_records(
    bytes: &[u8],
    layout: RecordLayout,
    policy: TrailingBytes,
) -> Result<Vec<RawRecord>, DatFileError> {
    let record_size = layout.record_size();
    let remainder = bytes.len() % record_size;
    if remainder != 0 {
        match policy {
            TrailingBytes::Fail => {
                return Err(DatFileError::TrailingBytes {
                    size: bytes.len(),
                    record_size,
                    remainder,
                })
            }
            TrailingBytes::Discard => log::warn!(
                "Discarding {remainder} trailing bytes which do not form a complete record"
            ),
        }
    }

    let n_records = bytes.len() / record_size;
    let mut records = Vec::with_capacity(n_records);
    let mut cursor = Cursor::new(&bytes[..n_records * record_size]);
    for _ in 0..n_records {
        records.push(RawRecord::read(&mut cursor, &layout)?);
    }
    Ok(records)
}

/// Read every record in a .dat file.
///
/// The whole file is read into memory; the handle is closed before decoding starts.
pub fn read_records(
    path: &Path,
    layout: RecordLayout,
    policy: TrailingBytes,
) -> Result<Vec<RawRecord>, DatFileError> {
    let mut bytes = Vec::new();
    {
        let mut file = File::open(path)?;
        file.read_to_end(&mut bytes)?;
    }
    log::info!(
        "Read {} from {}",
        human_bytes::human_bytes(bytes.len() as f64),
        path.to_string_lossy()
    );
    decode_records(&bytes, layout, policy)
}
