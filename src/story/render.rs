// Text rendering of a step of the story: the navigation bar, the text of the
// node, the choropleth and the statistics panel.

use std::collections::BTreeMap;

use crate::story::boundaries::BoundaryFeature;
use crate::story::*;

use regional_story::*;
use serde::Serialize;
use serde_json::{json, Value as JSValue};

const BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 14;
const HISTOGRAM_BINS: usize = 10;
const AGE_BARS: usize = 8;

/// What the map shows at one step.
#[derive(PartialEq, Debug, Clone)]
pub struct MapView {
    pub config: ResolvedMapConfig,
    pub values: RegionValues,
    pub scale: SequentialScale,
}

impl MapView {
    pub fn new(story: &Story, cursor: &Cursor, rows: &[Observation]) -> MapView {
        let config = story.map_config(cursor);
        let values = prepare_map_data(rows, &config.metric, cursor.chapter);
        let scale = SequentialScale::from_values(
            ColorScheme::from_name(&config.color_scheme),
            values.colors.values().cloned(),
        );
        MapView {
            config,
            values,
            scale,
        }
    }

    pub fn legend(&self) -> Option<[f64; 3]> {
        legend_stops(self.values.display.values().cloned())
    }

    /// The region name, then the metric and its display value.
    pub fn tooltip(&self, latin: &str) -> String {
        format!(
            "{}\n{}: {}",
            latin_to_cyrillic(latin),
            metric_label(&self.config.metric),
            format_value(&self.config.metric, self.values.display_value(latin))
        )
    }
}

/// Emitted when a region of the map is clicked. The value is the one used to
/// color the region.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ClickEvent {
    pub name: String,
    pub value: Option<f64>,
    pub properties: JSValue,
}

pub fn click(view: &MapView, feature: &BoundaryFeature) -> ClickEvent {
    ClickEvent {
        name: feature.name.clone(),
        value: view.values.color_value(&feature.name),
        properties: JSValue::Object(feature.properties.clone()),
    }
}

/// Finds a feature by its boundary name or by a Ukrainian name of the region.
pub fn find_feature<'a>(features: &'a [BoundaryFeature], name: &str) -> Option<&'a BoundaryFeature> {
    let name = name.trim();
    let latin = match find_by_cyrillic(name) {
        Some(r) => r.latin,
        None => name,
    };
    features.iter().find(|f| f.name == latin)
}

fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    if n >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - n))
    }
}

fn bar(position: f64, width: usize) -> String {
    let filled = (position.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_navigation(story: &Story, cursor: &Cursor) -> String {
    let dots: Vec<String> = story
        .indicators()
        .iter()
        .map(|i| {
            let dot = if i.index == cursor.chapter { "●" } else { "○" };
            if i.index == cursor.chapter && cursor.in_subsection_mode {
                let count = story.chapters()[i.index].sections.len();
                format!("{} [{}/{}]", dot, cursor.subsection + 1, count)
            } else {
                dot.to_string()
            }
        })
        .collect();
    let nav = Navigator::resting_at(story, *cursor);
    let up = if nav.as_ref().map_or(false, |n| n.can_go_previous()) {
        "▲"
    } else {
        "△"
    };
    let down = if nav.as_ref().map_or(false, |n| n.can_go_next()) {
        "▼"
    } else {
        "▽"
    };
    format!("{} {} {}", up, dots.join(" "), down)
}

pub fn render_map(view: &MapView, features: &[BoundaryFeature]) -> String {
    let mut lines: Vec<String> = vec![format!("## {}", view.config.title)];
    for f in features.iter() {
        let label = pad(&map_label(&f.name), LABEL_WIDTH);
        let line = match view.values.color_value(&f.name) {
            Some(c) => format!(
                "{} {} {} {}",
                label,
                bar(view.scale.position(c), BAR_WIDTH),
                view.scale.color(c).hex(),
                format_value(&view.config.metric, view.values.display_value(&f.name))
            ),
            None => format!(
                "{} {} {} {}",
                label,
                " ".repeat(BAR_WIDTH),
                NO_DATA_FILL.hex(),
                NO_DATA
            ),
        };
        lines.push(line.trim_end().to_string());
    }
    if let Some([lo, mid, hi]) = view.legend() {
        let metric = &view.config.metric;
        lines.push(format!(
            "{}: {} | {} | {}",
            legend_label(&view.config.title),
            format_legend_value(metric, lo),
            format_legend_value(metric, mid),
            format_legend_value(metric, hi)
        ));
    }
    lines.join("\n")
}

pub fn render_panel(chapter: usize, metric: &str, rows: &[Observation]) -> String {
    let mut lines: Vec<String> = vec![format!("## {}", panel_title(chapter, metric))];
    match panel_summary(rows) {
        PanelSummary::NoData => lines.push(NO_DATA.to_string()),
        PanelSummary::Ready {
            total_students,
            mean_score,
            top_region,
            ..
        } => {
            lines.push(format!(
                "Загальна кількість зарахованих: {}",
                format_thousands(total_students as f64)
            ));
            let mean = match mean_score {
                Some(m) if m > 0.0 => format!("{:.1}", m),
                _ => "N/A".to_string(),
            };
            lines.push(format!("Середній бал по Україні: {}", mean));
            lines.push(format!("Найвищий бал: {}", plain_region(&top_region)));
        }
    }
    match chart_for(metric) {
        PanelChart::ScoreHistogram => {
            for b in score_histogram(rows, HISTOGRAM_BINS) {
                lines.push(format!(
                    "{:.1}-{:.1} {}",
                    b.start,
                    b.end,
                    "▇".repeat(b.count)
                ));
            }
        }
        PanelChart::GenderSplit => {
            if let Some(g) = gender_split(rows) {
                lines.push(format!("Жінки {:.1}% | Чоловіки {:.1}%", g.female, g.male));
            }
        }
        PanelChart::AgeBars => {
            for a in age_bars(rows, AGE_BARS) {
                lines.push(format!(
                    "{} <18: {:.1}% >30: {:.1}%",
                    pad(&a.region, LABEL_WIDTH),
                    a.under_18,
                    a.over_30
                ));
            }
        }
        PanelChart::SubjectNominations => {
            let subjects = subject_nominations(rows);
            if subjects.is_empty() {
                lines.push(format!("{} (Предметні номінації)", NO_DATA));
            }
            for (subject, info) in subjects.iter() {
                let best = info.best.as_ref().map(|b| plain_region(&b.region));
                let worst = info.worst.as_ref().map(|b| plain_region(&b.region));
                lines.push(format!(
                    "{}: Найкращий: {} Найгірший: {}",
                    subject,
                    best.unwrap_or_default(),
                    worst.unwrap_or_default()
                ));
            }
        }
        PanelChart::Nothing => {}
    }
    lines.join("\n")
}

/// The full text of a step.
pub fn render_step(
    story: &Story,
    cursor: &Cursor,
    rows: &[Observation],
    features: &[BoundaryFeature],
) -> String {
    let view = MapView::new(story, cursor, rows);
    let mut parts: Vec<String> = vec![render_navigation(story, cursor)];
    if let Some((title, content)) = story.current_text(cursor) {
        parts.push(format!("# {}", title));
        if !content.is_empty() {
            parts.push(content.to_string());
        }
    }
    parts.push(render_map(&view, features));
    // The introduction shows the overall figures, subsections their chapter's chart.
    let panel = if cursor.chapter == INTRO_CHAPTER {
        Some(view.config.metric.as_str())
    } else if cursor.in_subsection_mode {
        story
            .chapters()
            .get(cursor.chapter)
            .and_then(|c| panel_key(&c.id))
    } else {
        None
    };
    if let Some(key) = panel {
        parts.push(render_panel(cursor.chapter, key, rows));
    }
    parts.join("\n\n")
}

/// The summary of a step, as written in the output file.
pub fn step_summary(story: &Story, cursor: &Cursor, rows: &[Observation]) -> JSValue {
    let view = MapView::new(story, cursor, rows);
    let step = story.step(cursor);
    let fills: BTreeMap<String, String> = view
        .values
        .colors
        .iter()
        .map(|(k, v)| (k.clone(), view.scale.color(*v).hex()))
        .collect();
    json!({
        "cursor": cursor,
        "id": step.map(|s| s.id()),
        "title": step.map(|s| s.title()),
        "mapConfig": view.config,
        "values": view.values.display,
        "fills": fills,
        "logScaled": view.values.log_scaled,
        "legend": view.legend(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::boundaries::builtin_features;

    fn rows() -> Vec<Observation> {
        vec![
            Observation::from_pairs(&[
                ("Region", "Сумська обл."),
                ("Total_Students", "999"),
                ("Average_Score", "150"),
            ]),
            Observation::from_pairs(&[
                ("Region", "м. Київ"),
                ("Total_Students", "9999"),
                ("Average_Score", "155"),
            ]),
        ]
    }

    fn intro() -> Cursor {
        Cursor::default()
    }

    #[test]
    fn intro_map_is_log_scaled() {
        let story = Story::builtin().unwrap();
        let view = MapView::new(&story, &intro(), &rows());
        assert_eq!(view.config.metric, "Total_Students");
        assert_eq!(view.scale.scheme, ColorScheme::Blues);
        assert!((view.scale.domain.0 - 3.0).abs() < 1e-12);
        assert!((view.scale.domain.1 - 4.0).abs() < 1e-12);
        // The legend shows the original values.
        assert_eq!(view.legend(), Some([999.0, 5499.0, 9999.0]));
        assert_eq!(view.tooltip("Sumy"), "Сумська область\nКількість студентів: 999");
        assert_eq!(
            view.tooltip("Crimea"),
            format!("Автономна Республіка Крим\nКількість студентів: {}", NO_DATA)
        );
    }

    #[test]
    fn map_lines() {
        let story = Story::builtin().unwrap();
        let view = MapView::new(&story, &intro(), &rows());
        let features = builtin_features();
        let text = render_map(&view, &features);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + features.len() + 1);
        assert!(lines[0].starts_with("## Кількість зарахованих"));
        let kyiv = lines.iter().find(|l| l.starts_with("Київ ")).unwrap();
        assert!(kyiv.contains(&"█".repeat(BAR_WIDTH)));
        assert!(kyiv.ends_with("9 999"));
        let crimea = lines.iter().find(|l| l.starts_with("Крим ")).unwrap();
        assert!(crimea.ends_with(&format!("#e6f3ff {}", NO_DATA)));
    }

    #[test]
    fn clicks_report_the_color_value() {
        let story = Story::builtin().unwrap();
        let view = MapView::new(&story, &intro(), &rows());
        let features = builtin_features();
        let feature = find_feature(&features, "Сумська обл.").unwrap();
        let event = click(&view, feature);
        assert_eq!(event.name, "Sumy");
        assert!((event.value.unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(event.properties["NAME_1"], json!("Sumy"));
        assert!(find_feature(&features, "Атлантида").is_none());
    }

    #[test]
    fn panel() {
        let text = render_panel(0, "Total_Students", &rows());
        assert!(text.starts_with("## Загальна статистика зарахування"));
        assert!(text.contains("Загальна кількість зарахованих: 10 998"));
        assert!(text.contains("Середній бал по Україні: 152.5"));
        assert!(text.contains("Найвищий бал: Київ"));
        let empty = render_panel(0, "Total_Students", &[]);
        assert!(empty.ends_with(NO_DATA));
    }

    #[test]
    fn subsections_show_their_chart() {
        let story = Story::builtin().unwrap();
        let scores = Cursor {
            chapter: 1,
            subsection: 0,
            in_subsection_mode: true,
        };
        let step = render_step(&story, &scores, &rows(), &builtin_features());
        assert!(step.contains("## Academic Performance Distribution"));
        assert!(step.contains("150.0-150.5 ▇"));

        let gender = vec![Observation::from_pairs(&[
            ("Region", "Сумська обл."),
            ("Female_Percentage", "48.5"),
            ("Male_Percentage", "51.5"),
        ])];
        let c = Cursor {
            chapter: 3,
            subsection: 0,
            in_subsection_mode: true,
        };
        let step = render_step(&story, &c, &gender, &builtin_features());
        assert!(step.contains("Жінки 48.5% | Чоловіки 51.5%"));
    }

    #[test]
    fn navigation_bar() {
        let story = Story::builtin().unwrap();
        let c = Cursor {
            chapter: 2,
            subsection: 1,
            in_subsection_mode: true,
        };
        assert_eq!(render_navigation(&story, &c), "▲ ○ ○ ● [2/3] ○ ▼");
        // The arrows are disabled at both ends.
        assert_eq!(render_navigation(&story, &intro()), "△ ● ○ ○ ○ ▼");
        let last = Cursor {
            chapter: 3,
            subsection: 2,
            in_subsection_mode: true,
        };
        assert_eq!(render_navigation(&story, &last), "▲ ○ ○ ○ ● [3/3] ▽");
        let step = render_step(&story, &c, &rows(), &builtin_features());
        assert!(step.contains("# Зарахування молоді до 18 років"));
        // The overall figures only show in the introduction.
        assert!(!step.contains("Загальна статистика"));
        assert!(step.contains("## Age Distribution Statistics"));
    }
}
