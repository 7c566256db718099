//! CSV export of membership lists. Uses the `csv` crate for safe quoting.
//!
//! One row per membership; fields with commas, quotes or newlines are quoted by the writer.

use crate::domain::MembershipRecord;

/// UTF-8 byte order mark. Spreadsheet apps need it to detect accented names.
pub const UTF8_BOM: &str = "\u{feff}";

const HEADERS: [&str; 15] = [
    "Client name",
    "Phone",
    "Email",
    "Membership type",
    "Plan",
    "Areas",
    "Monthly payment",
    "Initial payment",
    "Total sessions",
    "Completed sessions",
    "Progress (%)",
    "Status",
    "Start date",
    "Created",
    "Notes",
];

const DATE_FORMAT: &str = "%d/%m/%Y";

fn record_row(m: &MembershipRecord) -> [String; 15] {
    [
        m.client_name.clone(),
        m.client_phone.clone(),
        m.client_email.clone().unwrap_or_default(),
        m.membership_type.label().to_string(),
        m.plan_name.label().to_string(),
        m.area_names().join("; "),
        format!("${}", m.monthly_payment),
        format!("${}", m.initial_payment),
        m.total_sessions.to_string(),
        m.completed_sessions.to_string(),
        m.progress_percent().to_string(),
        m.status.label().to_string(),
        m.start_date.format(DATE_FORMAT).to_string(),
        m.created_at.format(DATE_FORMAT).to_string(),
        m.notes.clone().unwrap_or_default(),
    ]
}

/// Convert memberships to CSV text (header row included, BOM prefixed).
pub fn memberships_to_csv(records: &[MembershipRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;
    for m in records {
        wtr.write_record(record_row(m))?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    let body = String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    Ok(format!("{}{}", UTF8_BOM, body))
}

/// `memberships_2024-05-01.csv`
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("memberships_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Area, MembershipStatus, MembershipType, PlanTier};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(notes: Option<&str>) -> MembershipRecord {
        MembershipRecord {
            id: "1".into(),
            client_name: "Ana Lopez Garcia".into(),
            client_phone: "5512345678".into(),
            client_email: Some("ana@example.com".into()),
            membership_type: MembershipType::Custom,
            plan_name: PlanTier::Complete,
            areas: vec![
                Area::from_zone("Brazos").unwrap(),
                Area::from_zone("Abdomen").unwrap(),
            ],
            monthly_payment: 940,
            initial_payment: 940,
            total_sessions: 9,
            completed_sessions: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            status: MembershipStatus::Active,
            notes: notes.map(String::from),
            created_at: Utc.with_ymd_and_hms(2024, 2, 28, 18, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 2, 28, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_csv_basic_row() {
        let csv = memberships_to_csv(&[record(None)]).unwrap();
        assert!(csv.starts_with(UTF8_BOM));
        let mut lines = csv.trim_start_matches(UTF8_BOM).lines();
        assert!(lines.next().unwrap().starts_with("Client name,Phone,Email"));
        assert_eq!(
            lines.next().unwrap(),
            "Ana Lopez Garcia,5512345678,ana@example.com,custom,complete,Brazos; Abdomen,\
             $940,$940,9,3,33,active,01/03/2024,28/02/2024,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_quotes_special_chars() {
        let csv = memberships_to_csv(&[record(Some("Pays \"cash\",\nprefers mornings"))]).unwrap();
        assert!(csv.contains("\"Pays \"\"cash\"\",\nprefers mornings\""));
        let mut rdr = csv::Reader::from_reader(csv.trim_start_matches(UTF8_BOM).as_bytes());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[14], "Pays \"cash\",\nprefers mornings");
    }

    #[test]
    fn test_export_file_name() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(export_file_name(d), "memberships_2024-05-01.csv");
    }
}
