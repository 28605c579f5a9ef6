use std::path::Path;

use anyhow::Context;

use crate::models::Record;

/// Fixed relative location of the source dataset.
pub const DEFAULT_DATA_PATH: &str = "mission_internal_dashboard_data.csv";

/// Reads the full dataset into memory. Called once per process start; every
/// view works from the returned collection. Any missing column or
/// unparseable value aborts the load.
pub fn load(path: &Path) -> anyhow::Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dashboard data at {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<Record>() {
        let mut record =
            row.with_context(|| format!("malformed row in {}", path.display()))?;
        record.month = Record::month_bucket(record.join_date);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Join Date,Region,Persona,User Funnel,Mood Before,Mood After,\
Top Clicked Module,Most Watched Video,Daily Active,Monthly Active,Cohort Retention,\
Return Frequency,Unique Viewer,1+ Min Viewer,Content Completion Rate (%),\
Total Watchtime (min),Content Depth Score,Silent Scroll Rate,Design Pause Time (s),\
Thumbnail CTR,Search Bar CTR,App Load Time (ms),Recommendation Accuracy,\
App Downtime (hrs),Storage Used (GB),Onboarding Completion Rate,Mood Interaction Rate,\
Rewatches,Skips,Total Downloads,Total Deletions,Support Requests";

    fn row(join_date: &str, region: &str) -> String {
        format!(
            "{join_date},{region},Seeker,Organic,Curious,Calm,Meditation,Intro Talk,\
10,100,0.8,3,50,30,80.5,12.5,3.4,0.2,1.5,0.12,0.08,420,0.7,0.1,1.2,0.9,0.5,2,1,1,0,0"
        )
    }

    fn write_csv(lines: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn loads_typed_records_and_derives_month() {
        let file = write_csv(&[row("2024-03-15", "North"), row("2023-12-01", "South")]);
        let records = load(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, "North");
        assert_eq!(records[0].month, "2024-03");
        assert_eq!(records[0].daily_active, 10);
        assert_eq!(records[0].content_completion_rate, 80.5);
        assert_eq!(records[1].month, "2023-12");
    }

    #[test]
    fn preserves_source_row_order() {
        let file = write_csv(&[row("2024-03-15", "C"), row("2024-03-16", "A"), row("2024-03-17", "B")]);
        let records = load(file.path()).unwrap();
        let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["C", "A", "B"]);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load(Path::new("no-such-file.csv")).unwrap_err();
        assert!(err.to_string().contains("no-such-file.csv"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Join Date,Persona").unwrap();
        writeln!(file, "2024-03-15,Seeker").unwrap();
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn unparseable_join_date_is_fatal() {
        let file = write_csv(&[row("15/03/2024", "North")]);
        assert!(load(file.path()).is_err());
    }
}
