// src/services/exporter.rs

//! Tabular export of lesson records.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::LessonRecord;

/// Dataset columns, in file order.
pub const COLUMNS: [&str; 9] = [
    "date",
    "weekday",
    "start_time",
    "end_time",
    "type",
    "subject",
    "teacher",
    "location",
    "group",
];

/// Write records as comma-separated text with a header row.
///
/// The header is written even when there are no records. Returns the
/// number of records written.
pub fn write_records<W: Write>(records: &[LessonRecord], writer: W) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(COLUMNS)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;

    Ok(records.len())
}

/// Write records to a file, creating parent directories as needed.
pub fn export_to_path(records: &[LessonRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let count = write_records(records, File::create(path)?)?;
    log::info!("Saved {} record(s) to {}", count, path.display());
    Ok(count)
}

/// Read records back from exported text.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<LessonRecord>> {
    let mut csv = csv::Reader::from_reader(reader);
    let records = csv.deserialize().collect::<std::result::Result<Vec<LessonRecord>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<LessonRecord> {
        vec![
            LessonRecord {
                date: "2025-10-20".into(),
                weekday: "Понедельник".into(),
                start_time: "07:10".into(),
                end_time: "08:40".into(),
                lesson_type: "лаб".into(),
                subject: "Живопись, графика".into(),
                teacher: "Еремин В.Е.".into(),
                location: "Б-204".into(),
                group: "21-ДИбо-5".into(),
            },
            LessonRecord {
                subject: "Семинар \"Цвет\"".into(),
                ..LessonRecord::default()
            },
        ]
    }

    #[test]
    fn test_header_and_quoting() {
        let mut out = Vec::new();
        let count = write_records(&sample(), &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,weekday,start_time,end_time,type,subject,teacher,location,group")
        );
        assert_eq!(
            lines.next(),
            Some(
                "2025-10-20,Понедельник,07:10,08:40,лаб,\"Живопись, графика\",\
                 Еремин В.Е.,Б-204,21-ДИбо-5"
            )
        );
        assert_eq!(lines.next(), Some(",,,,,\"Семинар \"\"Цвет\"\"\",,,"));
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let mut out = Vec::new();
        assert_eq!(write_records(&[], &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", COLUMNS.join(","))
        );
    }

    #[test]
    fn test_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("schedule.csv");

        assert_eq!(export_to_path(&sample(), &path).unwrap(), 2);

        let loaded = read_records(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded, sample());
    }
}
