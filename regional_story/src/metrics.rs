//! Resolution of a metric key against a dataset row.
//!
//! Every metric the story can display is described by one [ExtractionRule].
//! The rules form a plain table so that the whole dispatch can be checked
//! exhaustively.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::config::{Observation, DEFAULT_METRIC};
use crate::regions::find_by_cyrillic;

/// Index of the introduction chapter.
pub const INTRO_CHAPTER: usize = 0;

pub const TOTAL_STUDENTS: &str = "Total_Students";
pub const AVERAGE_SCORE: &str = "Average_Score";
pub const UNDER_18_COUNT: &str = "Under_18_Count";
pub const NOMINATION_COUNT: &str = "Nomination_Count";
pub const FEMALE_PERCENTAGE: &str = "Female_Percentage";
pub const MALE_PERCENTAGE: &str = "Male_Percentage";

/// Displayed instead of a value for regions without data.
pub const NO_DATA: &str = "Немає даних";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NumericKind {
    /// Read like `parseInt`: the leading integer part only.
    Integer,
    /// Read like `parseFloat`: the leading decimal number.
    Float,
}

/// What to do when the field of a rule is absent or empty.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Fallback {
    /// `total - value(field)`, or zero if that field is missing as well.
    ComplementOf { field: &'static str, total: f64 },
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub key: &'static str,
    pub field: &'static str,
    pub kind: NumericKind,
    pub fallback: Option<Fallback>,
}

const fn rule(key: &'static str, kind: NumericKind) -> ExtractionRule {
    ExtractionRule {
        key,
        field: key,
        kind,
        fallback: None,
    }
}

pub static METRIC_RULES: [ExtractionRule; 21] = [
    rule(TOTAL_STUDENTS, NumericKind::Integer),
    rule(AVERAGE_SCORE, NumericKind::Float),
    rule("Near_Perfect_Percentage", NumericKind::Float),
    rule("Std_Deviation", NumericKind::Float),
    rule(NOMINATION_COUNT, NumericKind::Integer),
    rule("Min_Score", NumericKind::Float),
    rule("Median_Age", NumericKind::Float),
    rule("Min_Age", NumericKind::Float),
    rule("Under_18_Percentage", NumericKind::Float),
    rule(UNDER_18_COUNT, NumericKind::Integer),
    rule("Over_30_Percentage", NumericKind::Float),
    rule("Over_30_Count", NumericKind::Integer),
    rule("Gender_Balance_Score", NumericKind::Float),
    rule(FEMALE_PERCENTAGE, NumericKind::Float),
    ExtractionRule {
        key: MALE_PERCENTAGE,
        field: MALE_PERCENTAGE,
        kind: NumericKind::Float,
        fallback: Some(Fallback::ComplementOf {
            field: FEMALE_PERCENTAGE,
            total: 100.0,
        }),
    },
    rule("Gender_Score_Gap", NumericKind::Float),
    rule("Female_High_Perf_Percentage", NumericKind::Float),
    rule("Male_High_Perf_Percentage", NumericKind::Float),
    rule("Near_Perfect_Count", NumericKind::Integer),
    rule("Female_High_Perf_Count", NumericKind::Integer),
    rule("Male_High_Perf_Count", NumericKind::Integer),
];

pub fn is_known_metric(key: &str) -> bool {
    METRIC_RULES.iter().any(|r| r.key == key)
}

/// The rule for a metric key. Unknown keys read the total number of students.
pub fn rule_for(key: &str) -> &'static ExtractionRule {
    METRIC_RULES
        .iter()
        .find(|r| r.key == key)
        .or_else(|| METRIC_RULES.iter().find(|r| r.key == DEFAULT_METRIC))
        .unwrap_or(&METRIC_RULES[0])
}

// Splits an optional leading sign.
fn split_sign(s: &str) -> (f64, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (-1.0, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (1.0, rest)
    } else {
        (1.0, s)
    }
}

fn count_digits(s: &[u8]) -> usize {
    s.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Leading integer of the text, zero when there is none.
pub fn parse_int(raw: &str) -> f64 {
    let (sign, rest) = split_sign(raw.trim_start());
    let n = count_digits(rest.as_bytes());
    rest[..n].parse::<f64>().map(|x| sign * x).unwrap_or(0.0)
}

/// Leading decimal number of the text, zero when there is none.
pub fn parse_float(raw: &str) -> f64 {
    try_parse_float(raw).unwrap_or(0.0)
}

/// Leading decimal number of the text, if it starts with one.
pub fn try_parse_float(raw: &str) -> Option<f64> {
    let (sign, rest) = split_sign(raw.trim_start());
    let bytes = rest.as_bytes();
    let int_digits = count_digits(bytes);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(&bytes[exp_start.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }
    match rest[..end].parse::<f64>() {
        Ok(x) if x.is_finite() => Some(sign * x),
        _ => None,
    }
}

pub fn parse_value(kind: NumericKind, raw: &str) -> f64 {
    match kind {
        NumericKind::Integer => parse_int(raw),
        NumericKind::Float => parse_float(raw),
    }
}

/// Applies a rule to a row. Missing or unparsable values read as zero.
pub fn extract(rule: &ExtractionRule, row: &Observation) -> f64 {
    match (row.non_empty(rule.field), rule.fallback) {
        (Some(raw), _) => parse_value(rule.kind, raw),
        (None, Some(Fallback::ComplementOf { field, total })) => match row.non_empty(field) {
            Some(raw) => total - parse_float(raw),
            None => 0.0,
        },
        (None, None) => 0.0,
    }
}

/// The value of a metric for a row.
pub fn resolve(key: &str, row: &Observation) -> f64 {
    extract(rule_for(key), row)
}

/// Whether the map colors a metric on a logarithmic scale in a chapter.
pub fn is_log_scaled(chapter: usize, key: &str) -> bool {
    (chapter == INTRO_CHAPTER && key == TOTAL_STUDENTS) || key == UNDER_18_COUNT
}

/// Compresses skewed distributions for the color scale.
///
/// Only positive values are transformed, so that zero stays zero.
pub fn presentation_transform(chapter: usize, key: &str, value: f64) -> f64 {
    if is_log_scaled(chapter, key) && value > 0.0 {
        (value + 1.0).log10()
    } else {
        value
    }
}

/// The values of one metric for every region that has data.
///
/// Both maps are keyed by the boundary identifier of the region.
#[derive(PartialEq, Debug, Clone, Default, Serialize)]
pub struct RegionValues {
    pub metric: String,
    #[serde(rename = "logScaled")]
    pub log_scaled: bool,
    /// Values used for coloring the map.
    pub colors: BTreeMap<String, f64>,
    /// Untransformed values, for tooltips and legends.
    pub display: BTreeMap<String, f64>,
}

impl RegionValues {
    pub fn color_value(&self, latin: &str) -> Option<f64> {
        self.colors.get(latin).cloned()
    }

    pub fn display_value(&self, latin: &str) -> Option<f64> {
        self.display.get(latin).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Computes the values of a metric over the dataset, as displayed in a chapter.
///
/// Rows whose region cannot be placed on the map are skipped.
pub fn prepare_map_data(rows: &[Observation], metric: &str, chapter: usize) -> RegionValues {
    let rule = rule_for(metric);
    let log_scaled = is_log_scaled(chapter, metric);
    let mut res = RegionValues {
        metric: metric.to_string(),
        log_scaled,
        ..RegionValues::default()
    };
    for row in rows.iter() {
        let region = match row.region().and_then(find_by_cyrillic) {
            Some(r) => r,
            None => {
                debug!("prepare_map_data: skipping row {:?}", row.region());
                continue;
            }
        };
        let value = extract(rule, row);
        let color = presentation_transform(chapter, metric, value);
        if log_scaled && value > 0.0 {
            debug!(
                "prepare_map_data: log transform for {}: {} -> {:.2}",
                region.latin, value, color
            );
        }
        res.display.insert(region.latin.to_string(), value);
        res.colors.insert(region.latin.to_string(), color);
    }
    debug!(
        "prepare_map_data: metric: {:?} regions: {:?} log scaled: {:?}",
        metric,
        res.colors.len(),
        log_scaled
    );
    res
}

// ********* Labels and formatting **********

/// Ukrainian name of a metric, for tooltips.
pub fn metric_label(key: &str) -> &str {
    match key {
        "Total_Students" => "Кількість студентів",
        "Average_Score" => "Середній бал",
        "Under_18_Count" => "Студентів до 18 років",
        "Under_18_Percentage" => "Відсоток до 18 років",
        "Over_30_Count" => "Студентів понад 30 років",
        "Over_30_Percentage" => "Відсоток понад 30 років",
        "Near_Perfect_Count" => "Високобальників",
        "Median_Age" => "Медіанний вік",
        "Std_Deviation" => "Різноманітність балів",
        "Female_Percentage" => "Відсоток жінок",
        "Male_Percentage" => "Відсоток чоловіків",
        "Gender_Balance_Score" => "Гендерний баланс",
        "Gender_Score_Gap" => "Гендерний розрив у балах",
        x => x,
    }
}

/// The legend title derived from a map title.
pub fn legend_label(title: &str) -> String {
    title
        .replacen(" по регіонах", "", 1)
        .replacen("Кількість ", "", 1)
        .replacen("Відсоток ", "", 1)
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ValueFormat {
    Percent,
    Score,
    Age,
    Count,
    Plain,
}

impl ValueFormat {
    pub fn for_metric(key: &str) -> ValueFormat {
        let rule = rule_for(key);
        if key.contains("Percentage") {
            ValueFormat::Percent
        } else if key.contains("Score") || key.contains("Gap") || key.contains("Deviation") {
            ValueFormat::Score
        } else if key.contains("Age") {
            ValueFormat::Age
        } else if rule.kind == NumericKind::Integer {
            ValueFormat::Count
        } else {
            ValueFormat::Plain
        }
    }
}

/// Groups the thousands of a rounded value.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut res = String::new();
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            res.push(' ');
        }
        res.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", res)
    } else {
        res
    }
}

fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format_thousands(value)
    } else {
        let s = format!("{:.3}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Formats a value for a tooltip.
pub fn format_value(key: &str, value: Option<f64>) -> String {
    let value = match value {
        Some(v) => v,
        None => return NO_DATA.to_string(),
    };
    match ValueFormat::for_metric(key) {
        ValueFormat::Percent => format!("{:.1}%", value),
        ValueFormat::Score => format!("{:.2}", value),
        ValueFormat::Age => format!("{:.1}", value),
        ValueFormat::Count => format_thousands(value),
        ValueFormat::Plain => format_plain(value),
    }
}

/// Formats a value for the legend of the map.
pub fn format_legend_value(key: &str, value: f64) -> String {
    match ValueFormat::for_metric(key) {
        ValueFormat::Percent => format!("{:.1}%", value),
        ValueFormat::Count => format_thousands(value),
        _ if value >= 1000.0 => format_thousands(value),
        _ => format!("{:.1}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Observation {
        Observation::from_pairs(pairs)
    }

    #[test]
    fn every_rule_reads_its_own_field() {
        for r in METRIC_RULES.iter() {
            assert_eq!(rule_for(r.key), r);
            let obs = row(&[(r.field, "12")]);
            assert_eq!(extract(r, &obs), 12.0, "{}", r.key);
        }
    }

    #[test]
    fn unknown_metric_reads_total_students() {
        let obs = row(&[("Total_Students", "420"), ("Average_Score", "150.5")]);
        assert_eq!(rule_for("Not_A_Metric").key, TOTAL_STUDENTS);
        assert_eq!(resolve("Not_A_Metric", &obs), 420.0);
        assert_eq!(resolve("", &obs), 420.0);
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(parse_int("12.9"), 12.0);
        assert_eq!(parse_int(" 42 students"), 42.0);
        assert_eq!(parse_int("-7"), -7.0);
        assert_eq!(parse_int("abc"), 0.0);
        assert_eq!(parse_int(""), 0.0);
        assert_eq!(parse_float("157.52"), 157.52);
        assert_eq!(parse_float("157,52"), 157.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("2e"), 2.0);
        assert_eq!(parse_float("-3.25"), -3.25);
        assert_eq!(parse_float("n/a"), 0.0);
        assert_eq!(parse_float("."), 0.0);
        assert_eq!(try_parse_float("n/a"), None);
        assert_eq!(try_parse_float("0"), Some(0.0));
    }

    #[test]
    fn integer_metrics_drop_the_fraction() {
        let obs = row(&[("Total_Students", "1500.7"), ("Average_Score", "150.7")]);
        assert_eq!(resolve(TOTAL_STUDENTS, &obs), 1500.0);
        assert_eq!(resolve(AVERAGE_SCORE, &obs), 150.7);
    }

    #[test]
    fn male_percentage_fallbacks() {
        let derived = row(&[("Female_Percentage", "40")]);
        assert_eq!(resolve(MALE_PERCENTAGE, &derived), 60.0);

        let explicit = row(&[("Female_Percentage", "40"), ("Male_Percentage", "55")]);
        assert_eq!(resolve(MALE_PERCENTAGE, &explicit), 55.0);

        let empty_male = row(&[("Female_Percentage", "40"), ("Male_Percentage", "")]);
        assert_eq!(resolve(MALE_PERCENTAGE, &empty_male), 60.0);

        // Whitespace is a value, and it reads as zero.
        let blank_male = row(&[("Female_Percentage", "40"), ("Male_Percentage", " ")]);
        assert_eq!(resolve(MALE_PERCENTAGE, &blank_male), 0.0);

        let nothing = row(&[("Region", "Сумська обл.")]);
        assert_eq!(resolve(MALE_PERCENTAGE, &nothing), 0.0);
    }

    #[test]
    fn log_transform() {
        assert_eq!(presentation_transform(INTRO_CHAPTER, TOTAL_STUDENTS, 0.0), 0.0);
        assert!((presentation_transform(INTRO_CHAPTER, TOTAL_STUDENTS, 999.0) - 3.0).abs() < 1e-12);
        assert!((presentation_transform(2, UNDER_18_COUNT, 999.0) - 3.0).abs() < 1e-12);
        assert_eq!(presentation_transform(2, UNDER_18_COUNT, 0.0), 0.0);
        // Any other pair is left alone.
        assert_eq!(presentation_transform(1, TOTAL_STUDENTS, 999.0), 999.0);
        assert_eq!(presentation_transform(INTRO_CHAPTER, AVERAGE_SCORE, 999.0), 999.0);
        assert_eq!(presentation_transform(3, "Over_30_Count", 999.0), 999.0);
    }

    #[test]
    fn map_data_keeps_both_values() {
        let rows = vec![
            row(&[("Region", "Сумська обл."), ("Total_Students", "999")]),
            row(&[("Region", "м. Київ"), ("Total_Students", "0")]),
            row(&[("Region", "Невідома обл."), ("Total_Students", "5")]),
            row(&[("Total_Students", "5")]),
        ];
        let values = prepare_map_data(&rows, TOTAL_STUDENTS, INTRO_CHAPTER);
        assert!(values.log_scaled);
        assert_eq!(values.colors.len(), 2);
        assert_eq!(values.display_value("Sumy"), Some(999.0));
        assert!((values.color_value("Sumy").unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(values.color_value("Kiev City"), Some(0.0));
        assert_eq!(values.display_value("Kiev City"), Some(0.0));

        let later = prepare_map_data(&rows, TOTAL_STUDENTS, 1);
        assert!(!later.log_scaled);
        assert_eq!(later.color_value("Sumy"), Some(999.0));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_value("Female_Percentage", Some(60.594)), "60.6%");
        assert_eq!(format_value("Average_Score", Some(157.5)), "157.50");
        assert_eq!(format_value("Median_Age", Some(17.0)), "17.0");
        assert_eq!(format_value("Total_Students", Some(185472.0)), "185 472");
        assert_eq!(format_value("Total_Students", None), NO_DATA);
        assert_eq!(format_thousands(-1234.4), "-1 234");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_legend_value("Std_Deviation", 14.19), "14.2");
        assert_eq!(format_legend_value("Under_18_Count", 29680.0), "29 680");
    }

    #[test]
    fn legend_labels() {
        assert_eq!(metric_label("Median_Age"), "Медіанний вік");
        assert_eq!(metric_label("Custom"), "Custom");
        assert_eq!(
            legend_label("Кількість студентів до 18 років по регіонах"),
            "студентів до 18 років"
        );
        assert_eq!(
            legend_label("Відсоток жінок серед зарахованих по регіонах"),
            "жінок серед зарахованих"
        );
    }
}
