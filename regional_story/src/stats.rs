//! Aggregates of the statistics panel, and the data of its small charts.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::config::{Observation, REGION_COLUMN};
use crate::metrics::{
    parse_float, parse_int, try_parse_float, AVERAGE_SCORE, FEMALE_PERCENTAGE, INTRO_CHAPTER,
    MALE_PERCENTAGE, NOMINATION_COUNT, TOTAL_STUDENTS,
};

/// The subjects of the nominations, as written in `Nominations_Won`.
pub const SUBJECTS: [&str; 7] = [
    "Географія",
    "Біологія",
    "Фізика",
    "Математика",
    "Іноземна мова",
    "Хімія",
    "Історія України",
];

const NOMINATIONS_WON: &str = "Nominations_Won";
const UNDER_18_PERCENTAGE: &str = "Under_18_Percentage";
const OVER_30_PERCENTAGE: &str = "Over_30_Percentage";
const MEDIAN_AGE: &str = "Median_Age";

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum PanelSummary {
    /// No row carries a region, a total and a score.
    NoData,
    Ready {
        #[serde(rename = "totalStudents")]
        total_students: i64,
        /// Mean over the scores that parse as numbers.
        #[serde(rename = "meanScore")]
        mean_score: Option<f64>,
        /// Region of the first row with the highest score.
        #[serde(rename = "topRegion")]
        top_region: String,
        #[serde(rename = "totalNominations")]
        total_nominations: i64,
        #[serde(rename = "validRows")]
        valid_rows: usize,
    },
}

fn is_complete(row: &Observation) -> bool {
    row.non_empty(TOTAL_STUDENTS).is_some()
        && row.non_empty(AVERAGE_SCORE).is_some()
        && row.region().is_some()
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn panel_summary(rows: &[Observation]) -> PanelSummary {
    let valid: Vec<&Observation> = rows.iter().filter(|r| is_complete(r)).collect();
    debug!(
        "panel_summary: rows: {} valid rows: {}",
        rows.len(),
        valid.len()
    );
    let first = match valid.first() {
        Some(r) => *r,
        None => return PanelSummary::NoData,
    };

    let total_students: i64 = valid
        .iter()
        .map(|r| parse_int(r.get(TOTAL_STUDENTS).unwrap_or_default()) as i64)
        .sum();
    let mean_score = mean(
        valid
            .iter()
            .filter_map(|r| r.get(AVERAGE_SCORE).and_then(try_parse_float)),
    );
    let score = |r: &Observation| parse_float(r.get(AVERAGE_SCORE).unwrap_or_default());
    // Strictly greater: ties keep the earlier row.
    let top = valid
        .iter()
        .skip(1)
        .copied()
        .fold(first, |best, r| if score(r) > score(best) { r } else { best });
    let total_nominations: i64 = valid
        .iter()
        .map(|r| parse_int(r.get(NOMINATION_COUNT).unwrap_or_default()) as i64)
        .sum();

    PanelSummary::Ready {
        total_students,
        mean_score,
        top_region: top.region().unwrap_or_default().to_string(),
        total_nominations,
        valid_rows: valid.len(),
    }
}

/// The first word of a region name.
pub fn short_region(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}

/// A region name without its administrative prefix or suffix.
pub fn plain_region(name: &str) -> String {
    name.replacen(" обл.", "", 1).replacen("м. ", "", 1)
}

// ********* Panel charts **********

/// The title of the panel for the current chapter and panel key.
pub fn panel_title(chapter: usize, nomination: &str) -> &'static str {
    if chapter == INTRO_CHAPTER {
        return "Загальна статистика зарахування";
    }
    match nomination {
        "Highest_Average_Score" => "Academic Performance Distribution",
        "subject_excellence" => "Subject Excellence Analysis",
        "age_demographics" => "Age Distribution Statistics",
        "gender_balance" => "Gender Balance Overview",
        "regional_patterns" => "Regional Variation Patterns",
        _ => "Educational Overview Statistics",
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub enum PanelChart {
    ScoreHistogram,
    GenderSplit,
    AgeBars,
    SubjectNominations,
    Nothing,
}

/// The panel key of a chapter of the built-in story, for the charts shown
/// next to its subsections.
pub fn panel_key(chapter_id: &str) -> Option<&'static str> {
    match chapter_id {
        "score-results" => Some("Highest_Average_Score"),
        "age-demographics" => Some("age_demographics"),
        "gender-analysis" => Some("gender_balance"),
        _ => None,
    }
}

/// The chart drawn for a panel key.
pub fn chart_for(nomination: &str) -> PanelChart {
    match nomination {
        "Highest_Average_Score" | "regional_patterns" => PanelChart::ScoreHistogram,
        "gender_balance" => PanelChart::GenderSplit,
        "age_demographics" => PanelChart::AgeBars,
        "subject_excellence" => PanelChart::SubjectNominations,
        _ => PanelChart::Nothing,
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Counts the positive scores in equal-width bins spanning their extent.
///
/// The last bin includes its upper bound. A single distinct score yields a
/// single bin.
pub fn score_histogram(rows: &[Observation], bins: usize) -> Vec<HistogramBin> {
    let scores: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.non_empty(AVERAGE_SCORE).and_then(try_parse_float))
        .filter(|s| *s > 0.0)
        .collect();
    let (lo, hi) = match crate::scale::extent(scores.iter().cloned()) {
        Some(e) => e,
        None => return Vec::new(),
    };
    if bins == 0 {
        return Vec::new();
    }
    if hi == lo {
        return vec![HistogramBin {
            start: lo,
            end: hi,
            count: scores.len(),
        }];
    }
    let width = (hi - lo) / bins as f64;
    let mut res: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for s in scores.iter() {
        let idx = (((s - lo) / width).floor() as usize).min(bins - 1);
        res[idx].count += 1;
    }
    res
}

#[derive(PartialEq, Debug, Clone, Copy, Serialize)]
pub struct GenderSplit {
    pub female: f64,
    pub male: f64,
}

/// Mean female and male percentages over the rows that carry both.
pub fn gender_split(rows: &[Observation]) -> Option<GenderSplit> {
    let valid: Vec<&Observation> = rows
        .iter()
        .filter(|r| {
            r.non_empty(FEMALE_PERCENTAGE).is_some() && r.non_empty(MALE_PERCENTAGE).is_some()
        })
        .collect();
    let female = mean(
        valid
            .iter()
            .map(|r| parse_float(r.get(FEMALE_PERCENTAGE).unwrap_or_default())),
    )?;
    let male = mean(
        valid
            .iter()
            .map(|r| parse_float(r.get(MALE_PERCENTAGE).unwrap_or_default())),
    )?;
    Some(GenderSplit { female, male })
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct AgeBar {
    pub region: String,
    #[serde(rename = "under18")]
    pub under_18: f64,
    #[serde(rename = "over30")]
    pub over_30: f64,
    pub median: f64,
}

/// Age shares of the first `limit` regions that report both of them.
pub fn age_bars(rows: &[Observation], limit: usize) -> Vec<AgeBar> {
    rows.iter()
        .filter(|r| {
            r.region().is_some()
                && r.non_empty(UNDER_18_PERCENTAGE).is_some()
                && r.non_empty(OVER_30_PERCENTAGE).is_some()
        })
        .take(limit)
        .map(|r| AgeBar {
            region: short_region(r.region().unwrap_or_default()).to_string(),
            under_18: parse_float(r.get(UNDER_18_PERCENTAGE).unwrap_or_default()),
            over_30: parse_float(r.get(OVER_30_PERCENTAGE).unwrap_or_default()),
            median: parse_float(r.get(MEDIAN_AGE).unwrap_or_default()),
        })
        .collect()
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SubjectRegion {
    pub region: String,
    pub score: f64,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize)]
pub struct SubjectNominations {
    pub best: Option<SubjectRegion>,
    pub worst: Option<SubjectRegion>,
}

/// The best and worst regions of each subject, from the nominations won.
///
/// When several rows claim the same nomination, the last one is kept.
pub fn subject_nominations(rows: &[Observation]) -> BTreeMap<&'static str, SubjectNominations> {
    let mut res: BTreeMap<&'static str, SubjectNominations> = BTreeMap::new();
    for row in rows.iter() {
        let won = match row.non_empty(NOMINATIONS_WON) {
            Some(w) if w != "None" => w,
            _ => continue,
        };
        let entry = || SubjectRegion {
            region: row.get(REGION_COLUMN).unwrap_or_default().to_string(),
            score: parse_float(row.get(AVERAGE_SCORE).unwrap_or_default()),
        };
        for nomination in won.split(", ") {
            for subject in SUBJECTS.iter() {
                if nomination.contains(&format!("Highest_{}", subject)) {
                    res.entry(*subject).or_default().best = Some(entry());
                }
                if nomination.contains(&format!("Lowest_{}", subject)) {
                    res.entry(*subject).or_default().worst = Some(entry());
                }
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Observation {
        Observation::from_pairs(pairs)
    }

    #[test]
    fn summary_skips_incomplete_rows() {
        let rows = vec![
            row(&[
                ("Region", "Сумська обл."),
                ("Total_Students", "10"),
                ("Average_Score", "80"),
            ]),
            row(&[
                ("Region", "Полтавська обл."),
                ("Total_Students", "0"),
                ("Average_Score", ""),
            ]),
        ];
        assert_eq!(
            panel_summary(&rows),
            PanelSummary::Ready {
                total_students: 10,
                mean_score: Some(80.0),
                top_region: "Сумська обл.".to_string(),
                total_nominations: 0,
                valid_rows: 1,
            }
        );
    }

    #[test]
    fn summary_ties_keep_the_first_row() {
        let rows = vec![
            row(&[
                ("Region", "Сумська обл."),
                ("Total_Students", "1 200"),
                ("Average_Score", "150"),
                ("Nomination_Count", "2"),
            ]),
            row(&[
                ("Region", "м. Київ"),
                ("Total_Students", "3000"),
                ("Average_Score", "150.0"),
                ("Nomination_Count", "3"),
            ]),
            row(&[
                ("Region", "Волинська обл."),
                ("Total_Students", "500"),
                ("Average_Score", "n/a"),
            ]),
        ];
        match panel_summary(&rows) {
            PanelSummary::Ready {
                total_students,
                mean_score,
                top_region,
                total_nominations,
                valid_rows,
            } => {
                assert_eq!(total_students, 1 + 3000 + 500);
                assert_eq!(mean_score, Some(150.0));
                assert_eq!(top_region, "Сумська обл.");
                assert_eq!(total_nominations, 5);
                assert_eq!(valid_rows, 3);
            }
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn summary_without_data() {
        assert_eq!(panel_summary(&[]), PanelSummary::NoData);
        let rows = vec![row(&[("Total_Students", "10"), ("Average_Score", "80")])];
        assert_eq!(panel_summary(&rows), PanelSummary::NoData);
    }

    #[test]
    fn titles_and_charts() {
        assert_eq!(panel_title(0, "gender_balance"), "Загальна статистика зарахування");
        assert_eq!(panel_title(2, "gender_balance"), "Gender Balance Overview");
        assert_eq!(panel_title(1, "Average_Score"), "Educational Overview Statistics");
        assert_eq!(chart_for("regional_patterns"), PanelChart::ScoreHistogram);
        assert_eq!(chart_for("Median_Age"), PanelChart::Nothing);
        assert_eq!(panel_key("age-demographics").map(chart_for), Some(PanelChart::AgeBars));
        assert_eq!(panel_key("gender-analysis").map(chart_for), Some(PanelChart::GenderSplit));
        assert_eq!(panel_key("intro"), None);
    }

    #[test]
    fn histogram_bins() {
        let rows: Vec<Observation> = ["140", "141", "150", "160", "0", "", "x"]
            .iter()
            .map(|s| row(&[("Average_Score", s)]))
            .collect();
        let bins = score_histogram(&rows, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].start, 140.0);
        assert_eq!(bins[0].end, 150.0);
        assert_eq!(bins[0].count, 2);
        // The maximum falls into the last bin.
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[1].end, 160.0);

        let flat = score_histogram(&rows[..1], 10);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 1);
        assert!(score_histogram(&[], 10).is_empty());
    }

    #[test]
    fn gender_means() {
        let rows = vec![
            row(&[("Female_Percentage", "60"), ("Male_Percentage", "40")]),
            row(&[("Female_Percentage", "50"), ("Male_Percentage", "50")]),
            row(&[("Female_Percentage", "10")]),
        ];
        assert_eq!(
            gender_split(&rows),
            Some(GenderSplit {
                female: 55.0,
                male: 45.0
            })
        );
        assert_eq!(gender_split(&rows[2..]), None);
    }

    #[test]
    fn age_bars_use_short_names() {
        let rows: Vec<Observation> = (0..10)
            .map(|_| {
                row(&[
                    ("Region", "Львівська обл."),
                    ("Under_18_Percentage", "69.69"),
                    ("Over_30_Percentage", "3.5"),
                ])
            })
            .collect();
        let bars = age_bars(&rows, 8);
        assert_eq!(bars.len(), 8);
        assert_eq!(bars[0].region, "Львівська");
        assert_eq!(bars[0].under_18, 69.69);
        assert_eq!(bars[0].median, 0.0);
    }

    #[test]
    fn subjects_from_nominations() {
        let rows = vec![
            row(&[
                ("Region", "Харківська обл."),
                ("Average_Score", "157.52"),
                ("Nominations_Won", "Highest_Фізика, Lowest_Хімія"),
            ]),
            row(&[
                ("Region", "м. Київ"),
                ("Average_Score", "155"),
                ("Nominations_Won", "Highest_Хімія"),
            ]),
            row(&[("Region", "Сумська обл."), ("Nominations_Won", "None")]),
        ];
        let subjects = subject_nominations(&rows);
        assert_eq!(subjects.len(), 2);
        let physics = &subjects["Фізика"];
        assert_eq!(physics.best.as_ref().map(|b| b.score), Some(157.52));
        assert!(physics.worst.is_none());
        let chemistry = &subjects["Хімія"];
        assert_eq!(
            chemistry.best.as_ref().map(|b| plain_region(&b.region)),
            Some("Київ".to_string())
        );
        assert_eq!(
            chemistry.worst.as_ref().map(|b| plain_region(&b.region)),
            Some("Харківська".to_string())
        );
    }
}
