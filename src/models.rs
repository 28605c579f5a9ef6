use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the source dataset: a single onboarded user/session
/// observation. Field names map onto the CSV header row; a missing column or
/// an unparseable value fails the whole load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "Join Date")]
    pub join_date: NaiveDate,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Persona")]
    pub persona: String,
    #[serde(rename = "User Funnel")]
    pub user_funnel: String,
    #[serde(rename = "Mood Before")]
    pub mood_before: String,
    #[serde(rename = "Mood After")]
    pub mood_after: String,
    #[serde(rename = "Top Clicked Module")]
    pub top_clicked_module: String,
    #[serde(rename = "Most Watched Video")]
    pub most_watched_video: String,
    #[serde(rename = "Daily Active")]
    pub daily_active: u64,
    #[serde(rename = "Monthly Active")]
    pub monthly_active: u64,
    #[serde(rename = "Cohort Retention")]
    pub cohort_retention: f64,
    #[serde(rename = "Return Frequency")]
    pub return_frequency: f64,
    #[serde(rename = "Unique Viewer")]
    pub unique_viewers: u64,
    #[serde(rename = "1+ Min Viewer")]
    pub one_min_viewers: u64,
    #[serde(rename = "Content Completion Rate (%)")]
    pub content_completion_rate: f64,
    #[serde(rename = "Total Watchtime (min)")]
    pub total_watchtime_min: f64,
    #[serde(rename = "Content Depth Score")]
    pub content_depth_score: f64,
    #[serde(rename = "Silent Scroll Rate")]
    pub silent_scroll_rate: f64,
    #[serde(rename = "Design Pause Time (s)")]
    pub design_pause_time_s: f64,
    #[serde(rename = "Thumbnail CTR")]
    pub thumbnail_ctr: f64,
    #[serde(rename = "Search Bar CTR")]
    pub search_bar_ctr: f64,
    #[serde(rename = "App Load Time (ms)")]
    pub app_load_time_ms: f64,
    #[serde(rename = "Recommendation Accuracy")]
    pub recommendation_accuracy: f64,
    #[serde(rename = "App Downtime (hrs)")]
    pub app_downtime_hrs: f64,
    #[serde(rename = "Storage Used (GB)")]
    pub storage_used_gb: f64,
    #[serde(rename = "Onboarding Completion Rate")]
    pub onboarding_completion_rate: f64,
    #[serde(rename = "Mood Interaction Rate")]
    pub mood_interaction_rate: f64,
    #[serde(rename = "Rewatches")]
    pub rewatches: u64,
    #[serde(rename = "Skips")]
    pub skips: u64,
    #[serde(rename = "Total Downloads")]
    pub total_downloads: u64,
    #[serde(rename = "Total Deletions")]
    pub total_deletions: u64,
    #[serde(rename = "Support Requests")]
    pub support_requests: u64,
    /// Year-month bucket of `join_date`, derived once at load and immutable
    /// thereafter.
    #[serde(skip)]
    pub month: String,
}

impl Record {
    pub fn month_bucket(date: NaiveDate) -> String {
        format!("{:04}-{:02}", date.year(), date.month())
    }
}

/// One dashboard tab: a fixed ordered list of display items computed from the
/// filtered record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub name: &'static str,
    pub title: &'static str,
    pub items: Vec<ViewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewItem {
    Metric {
        label: &'static str,
        value: MetricValue,
    },
    BarChart {
        title: &'static str,
        bars: Vec<(String, u64)>,
    },
    /// One value per filtered record, for each named series.
    SeriesChart {
        title: &'static str,
        series: Vec<Series>,
    },
    TimeSeries {
        title: &'static str,
        points: Vec<(String, u64)>,
    },
    Table {
        title: &'static str,
        headers: Vec<&'static str>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Count(u64),
    Decimal { value: f64, places: u8 },
    Text(String),
    /// Aggregate over an empty selection; rendered as "N/A".
    Unavailable,
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Decimal { value, places } => {
                write!(f, "{:.*}", *places as usize, value)
            }
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Unavailable => f.write_str("N/A"),
        }
    }
}

#[cfg(test)]
pub fn sample_record() -> Record {
    Record {
        join_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        region: "North".to_string(),
        persona: "Seeker".to_string(),
        user_funnel: "Organic".to_string(),
        mood_before: "Curious".to_string(),
        mood_after: "Calm".to_string(),
        top_clicked_module: "Meditation".to_string(),
        most_watched_video: "Intro Talk".to_string(),
        daily_active: 10,
        monthly_active: 100,
        cohort_retention: 0.8,
        return_frequency: 3.0,
        unique_viewers: 50,
        one_min_viewers: 30,
        content_completion_rate: 80.0,
        total_watchtime_min: 12.5,
        content_depth_score: 3.4,
        silent_scroll_rate: 0.2,
        design_pause_time_s: 1.5,
        thumbnail_ctr: 0.12,
        search_bar_ctr: 0.08,
        app_load_time_ms: 420.0,
        recommendation_accuracy: 0.7,
        app_downtime_hrs: 0.1,
        storage_used_gb: 1.2,
        onboarding_completion_rate: 0.9,
        mood_interaction_rate: 0.5,
        rewatches: 2,
        skips: 1,
        total_downloads: 1,
        total_deletions: 0,
        support_requests: 0,
        month: "2024-03".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bucket_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(Record::month_bucket(date), "2024-03");

        let december = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(Record::month_bucket(december), "2023-12");
    }

    #[test]
    fn metric_values_render_for_display() {
        assert_eq!(MetricValue::Count(35).to_string(), "35");
        assert_eq!(
            MetricValue::Decimal {
                value: 85.5,
                places: 2
            }
            .to_string(),
            "85.50"
        );
        assert_eq!(
            MetricValue::Decimal {
                value: 420.0,
                places: 1
            }
            .to_string(),
            "420.0"
        );
        assert_eq!(
            MetricValue::Text("North".to_string()).to_string(),
            "North"
        );
        assert_eq!(MetricValue::Unavailable.to_string(), "N/A");
    }
}
