use std::collections::BTreeMap;

use crate::models::{MetricValue, Record, Series, View, ViewItem};

/// Rounds to `places` decimal places, ties to even. Every displayed mean in
/// every view goes through this.
pub fn round_to(value: f64, places: u8) -> f64 {
    let scale = 10f64.powi(i32::from(places));
    (value * scale).round_ties_even() / scale
}

/// Arithmetic mean rounded to `places`. An empty selection has no mean.
pub fn mean<I>(values: I, places: u8) -> MetricValue
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }

    if count == 0 {
        MetricValue::Unavailable
    } else {
        MetricValue::Decimal {
            value: round_to(sum / count as f64, places),
            places,
        }
    }
}

pub fn total<I>(values: I) -> MetricValue
where
    I: IntoIterator<Item = u64>,
{
    MetricValue::Count(values.into_iter().sum())
}

/// Most frequent value; ties go to the value that sorts first. An empty
/// selection has no mode.
pub fn mode<'a, I>(values: I) -> MetricValue
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, u64)> = None;
    for (value, count) in counts {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| MetricValue::Text(value.to_string()))
        .unwrap_or(MetricValue::Unavailable)
}

/// Occurrence count per distinct value, ordered by descending count then
/// ascending value.
fn frequencies<'a, I>(values: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut bars: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    bars.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    bars
}

/// Record count per month bucket, ascending by month.
fn month_counts(records: &[Record]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.month.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(month, count)| (month.to_string(), count))
        .collect()
}

/// Record count per (mood before, mood after) pair, ascending by pair.
fn mood_shift_rows(records: &[Record]) -> Vec<Vec<String>> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for record in records {
        *counts
            .entry((record.mood_before.as_str(), record.mood_after.as_str()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((before, after), count)| {
            vec![before.to_string(), after.to_string(), count.to_string()]
        })
        .collect()
}

pub fn management_view(records: &[Record]) -> View {
    View {
        name: "Management",
        title: "Management View",
        items: vec![
            ViewItem::Metric {
                label: "New Users Onboarded",
                value: MetricValue::Count(records.len() as u64),
            },
            ViewItem::Metric {
                label: "Most Active Region",
                value: mode(records.iter().map(|r| r.region.as_str())),
            },
            ViewItem::Metric {
                label: "Most Common Funnel",
                value: mode(records.iter().map(|r| r.user_funnel.as_str())),
            },
            ViewItem::SeriesChart {
                title: "User Retention vs Churn",
                series: vec![
                    Series {
                        name: "Cohort Retention",
                        values: records.iter().map(|r| r.cohort_retention).collect(),
                    },
                    Series {
                        name: "Return Frequency",
                        values: records.iter().map(|r| r.return_frequency).collect(),
                    },
                ],
            },
            ViewItem::Metric {
                label: "Daily Active Users",
                value: total(records.iter().map(|r| r.daily_active)),
            },
            ViewItem::Metric {
                label: "Monthly Active Users",
                value: total(records.iter().map(|r| r.monthly_active)),
            },
            ViewItem::TimeSeries {
                title: "User Growth Over Time",
                points: month_counts(records),
            },
        ],
    }
}

pub fn content_view(records: &[Record]) -> View {
    View {
        name: "Content",
        title: "Content View",
        items: vec![
            ViewItem::Metric {
                label: "Unique Viewers",
                value: total(records.iter().map(|r| r.unique_viewers)),
            },
            ViewItem::Metric {
                label: "Viewers > 1 min",
                value: total(records.iter().map(|r| r.one_min_viewers)),
            },
            ViewItem::Metric {
                label: "Avg Completion Rate (%)",
                value: mean(records.iter().map(|r| r.content_completion_rate), 2),
            },
            ViewItem::Metric {
                label: "Avg Total Watchtime (min)",
                value: mean(records.iter().map(|r| r.total_watchtime_min), 2),
            },
            ViewItem::Metric {
                label: "Avg Depth Score",
                value: mean(records.iter().map(|r| r.content_depth_score), 2),
            },
            ViewItem::BarChart {
                title: "Most Watched Content",
                bars: frequencies(records.iter().map(|r| r.most_watched_video.as_str())),
            },
        ],
    }
}

pub fn design_view(records: &[Record]) -> View {
    View {
        name: "Design",
        title: "Design View",
        items: vec![
            ViewItem::Metric {
                label: "Avg Silent Scroll Rate",
                value: mean(records.iter().map(|r| r.silent_scroll_rate), 2),
            },
            ViewItem::Metric {
                label: "Avg Design Pause Time (s)",
                value: mean(records.iter().map(|r| r.design_pause_time_s), 2),
            },
            ViewItem::Metric {
                label: "Avg Thumbnail CTR",
                value: mean(records.iter().map(|r| r.thumbnail_ctr), 2),
            },
            ViewItem::Table {
                title: "Mood Drop-off",
                headers: vec!["Mood Before", "Mood After", "Count"],
                rows: mood_shift_rows(records),
            },
        ],
    }
}

pub fn tech_view(records: &[Record]) -> View {
    View {
        name: "Tech",
        title: "Tech Dashboard",
        items: vec![
            ViewItem::Metric {
                label: "Avg Search Bar CTR",
                value: mean(records.iter().map(|r| r.search_bar_ctr), 2),
            },
            ViewItem::Metric {
                label: "Avg App Load Time (ms)",
                value: mean(records.iter().map(|r| r.app_load_time_ms), 1),
            },
            ViewItem::Metric {
                label: "Avg Recommendation Accuracy",
                value: mean(records.iter().map(|r| r.recommendation_accuracy), 2),
            },
            ViewItem::Metric {
                label: "Avg App Downtime (hrs)",
                value: mean(records.iter().map(|r| r.app_downtime_hrs), 2),
            },
            ViewItem::Metric {
                label: "Avg Storage Used (GB)",
                value: mean(records.iter().map(|r| r.storage_used_gb), 2),
            },
        ],
    }
}

pub fn pre_join_view(records: &[Record]) -> View {
    View {
        name: "Pre-Join",
        title: "Pre-Joining Metrics",
        items: vec![
            ViewItem::Metric {
                label: "Avg Onboarding Completion Rate",
                value: mean(records.iter().map(|r| r.onboarding_completion_rate), 2),
            },
            ViewItem::Metric {
                label: "Avg Mood Interaction Rate",
                value: mean(records.iter().map(|r| r.mood_interaction_rate), 2),
            },
            ViewItem::Metric {
                label: "Most Clicked Module",
                value: mode(records.iter().map(|r| r.top_clicked_module.as_str())),
            },
            ViewItem::Metric {
                label: "Total Rewatches",
                value: total(records.iter().map(|r| r.rewatches)),
            },
            ViewItem::Metric {
                label: "Total Skips",
                value: total(records.iter().map(|r| r.skips)),
            },
        ],
    }
}

pub fn post_launch_view(records: &[Record]) -> View {
    View {
        name: "Post-Launch",
        title: "Post-Launch Metrics",
        items: vec![
            ViewItem::Metric {
                label: "Total Downloads",
                value: total(records.iter().map(|r| r.total_downloads)),
            },
            ViewItem::Metric {
                label: "Total Deletions",
                value: total(records.iter().map(|r| r.total_deletions)),
            },
            ViewItem::Metric {
                label: "Total Support Requests",
                value: total(records.iter().map(|r| r.support_requests)),
            },
            ViewItem::Metric {
                label: "Avg Return Frequency",
                value: mean(records.iter().map(|r| r.return_frequency), 2),
            },
            ViewItem::Metric {
                label: "Avg Cohort Retention",
                value: mean(records.iter().map(|r| r.cohort_retention), 2),
            },
        ],
    }
}

/// All six views in fixed tab order.
pub fn all_views(records: &[Record]) -> Vec<View> {
    vec![
        management_view(records),
        content_view(records),
        design_view(records),
        tech_view(records),
        pre_join_view(records),
        post_launch_view(records),
    ]
}
