//! The story: an ordered list of chapters, each with an optional list of
//! subsections. Every node carries its text and what the map shows.

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::metrics::is_known_metric;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Subsection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "mapConfig", default, skip_serializing_if = "Option::is_none")]
    pub map_config: Option<MapConfig>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "mapConfig", default, skip_serializing_if = "Option::is_none")]
    pub map_config: Option<MapConfig>,
    #[serde(default)]
    pub sections: Vec<Subsection>,
}

impl Chapter {
    pub fn has_subsections(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// A chapter indicator of the navigation bar.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ChapterIndicator {
    pub index: usize,
    pub id: String,
    pub title: String,
    #[serde(rename = "hasSubsections")]
    pub has_subsections: bool,
}

/// The nodes under a cursor.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct StoryStep<'a> {
    pub chapter: &'a Chapter,
    pub subsection: Option<&'a Subsection>,
}

impl<'a> StoryStep<'a> {
    pub fn title(&self) -> &'a str {
        match self.subsection {
            Some(s) => s.title.as_str(),
            None => self.chapter.title.as_str(),
        }
    }

    pub fn content(&self) -> &'a str {
        match self.subsection {
            Some(s) => s.content.as_str(),
            None => self.chapter.content.as_str(),
        }
    }

    pub fn id(&self) -> &'a str {
        match self.subsection {
            Some(s) => s.id.as_str(),
            None => self.chapter.id.as_str(),
        }
    }
}

/// A validated story. It cannot be changed once built.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Story {
    chapters: Vec<Chapter>,
}

impl Story {
    /// Checks the chapters and assembles them into a story.
    pub fn from_chapters(chapters: Vec<Chapter>) -> Result<Story, StoryErrors> {
        if chapters.is_empty() {
            return Err(StoryErrors::EmptyStory);
        }
        let mut ids: HashSet<&str> = HashSet::new();
        for (c_idx, chapter) in chapters.iter().enumerate() {
            if chapter.id.trim().is_empty() {
                return Err(StoryErrors::MissingChapterId(c_idx));
            }
            if !ids.insert(chapter.id.as_str()) {
                return Err(StoryErrors::DuplicateId(chapter.id.clone()));
            }
            check_metric(&chapter.id, chapter.map_config.as_ref());
            for (s_idx, section) in chapter.sections.iter().enumerate() {
                if section.id.trim().is_empty() {
                    return Err(StoryErrors::MissingSubsectionId {
                        chapter: c_idx,
                        subsection: s_idx,
                    });
                }
                if !ids.insert(section.id.as_str()) {
                    return Err(StoryErrors::DuplicateId(section.id.clone()));
                }
                check_metric(&section.id, section.map_config.as_ref());
            }
        }
        Ok(Story { chapters })
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn subsection_counts(&self) -> Vec<usize> {
        self.chapters.iter().map(|c| c.sections.len()).collect()
    }

    pub fn indicators(&self) -> Vec<ChapterIndicator> {
        self.chapters
            .iter()
            .enumerate()
            .map(|(index, c)| ChapterIndicator {
                index,
                id: c.id.clone(),
                title: c.title.clone(),
                has_subsections: c.has_subsections(),
            })
            .collect()
    }

    /// The chapter and, in subsection mode, the subsection under the cursor.
    pub fn step(&self, cursor: &Cursor) -> Option<StoryStep<'_>> {
        let chapter = self.chapters.get(cursor.chapter)?;
        let subsection = if cursor.in_subsection_mode {
            chapter.sections.get(cursor.subsection)
        } else {
            None
        };
        Some(StoryStep {
            chapter,
            subsection,
        })
    }

    /// Title and content of the node under the cursor.
    pub fn current_text(&self, cursor: &Cursor) -> Option<(&str, &str)> {
        self.step(cursor).map(|s| (s.title(), s.content()))
    }

    /// The map configuration in effect at a cursor.
    ///
    /// The subsection configuration wins over the chapter configuration, which
    /// wins over the default one. Fields are merged one by one.
    pub fn map_config(&self, cursor: &Cursor) -> ResolvedMapConfig {
        let default = ResolvedMapConfig::default_config();
        let chapter = match self.chapters.get(cursor.chapter) {
            Some(c) => c,
            None => {
                warn!(
                    "Invalid chapter index {}, using default config",
                    cursor.chapter
                );
                return default;
            }
        };
        if cursor.in_subsection_mode {
            if let Some(cfg) = chapter
                .sections
                .get(cursor.subsection)
                .and_then(|s| s.map_config.as_ref())
            {
                return default.merged(cfg);
            }
        }
        match &chapter.map_config {
            Some(cfg) => default.merged(cfg),
            None => {
                warn!(
                    "No map config found for chapter {:?}, using default",
                    chapter.title
                );
                default
            }
        }
    }
}

fn check_metric(node_id: &str, config: Option<&MapConfig>) {
    if let Some(metric) = config.and_then(|c| c.metric.as_deref()) {
        if !is_known_metric(metric) {
            warn!(
                "Node {:?} uses unknown metric {:?}, it will display {}",
                node_id, metric, DEFAULT_METRIC
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, cfg: Option<MapConfig>) -> Subsection {
        Subsection {
            id: id.to_string(),
            title: format!("title {}", id),
            content: String::new(),
            map_config: cfg,
        }
    }

    fn chapter(id: &str, cfg: Option<MapConfig>, sections: Vec<Subsection>) -> Chapter {
        Chapter {
            id: id.to_string(),
            title: format!("title {}", id),
            content: format!("content {}", id),
            map_config: cfg,
            sections,
        }
    }

    fn cursor(chapter: usize, subsection: usize, in_subsection_mode: bool) -> Cursor {
        Cursor {
            chapter,
            subsection,
            in_subsection_mode,
        }
    }

    fn story() -> Story {
        Story::from_chapters(vec![
            chapter(
                "intro",
                Some(MapConfig::new("Total_Students", "interpolateBlues", "Intro")),
                vec![],
            ),
            chapter(
                "scores",
                Some(MapConfig::new("Average_Score", "interpolateBlues", "Scores")),
                vec![
                    section(
                        "spread",
                        Some(MapConfig {
                            metric: Some("Std_Deviation".to_string()),
                            ..MapConfig::default()
                        }),
                    ),
                    section("inherits", None),
                ],
            ),
            chapter("bare", None, vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn subsection_config_wins() {
        let cfg = story().map_config(&cursor(1, 0, true));
        assert_eq!(cfg.metric, "Std_Deviation");
        // Merged over the default, not over the chapter.
        assert_eq!(cfg.color_scheme, DEFAULT_COLOR_SCHEME);
        assert_eq!(cfg.title, DEFAULT_TITLE);
    }

    #[test]
    fn subsection_without_config_inherits_chapter() {
        let cfg = story().map_config(&cursor(1, 1, true));
        assert_eq!(cfg, ResolvedMapConfig::default_config().merged(&MapConfig::new(
            "Average_Score",
            "interpolateBlues",
            "Scores"
        )));
    }

    #[test]
    fn chapter_config_outside_subsection_mode() {
        let cfg = story().map_config(&cursor(1, 0, false));
        assert_eq!(cfg.metric, "Average_Score");
    }

    #[test]
    fn bare_chapter_uses_default() {
        let s = story();
        assert_eq!(
            s.map_config(&cursor(2, 0, false)),
            ResolvedMapConfig::default_config()
        );
        assert_eq!(
            s.map_config(&cursor(17, 0, false)),
            ResolvedMapConfig::default_config()
        );
    }

    #[test]
    fn steps_and_indicators() {
        let s = story();
        let step = s.step(&cursor(1, 1, true)).unwrap();
        assert_eq!(step.id(), "inherits");
        assert_eq!(step.title(), "title inherits");
        let chapter_step = s.step(&cursor(1, 1, false)).unwrap();
        assert_eq!(chapter_step.id(), "scores");
        assert_eq!(chapter_step.content(), "content scores");
        assert!(s.step(&cursor(3, 0, false)).is_none());
        assert_eq!(
            s.current_text(&cursor(0, 0, false)),
            Some(("title intro", "content intro"))
        );

        let dots = s.indicators();
        assert_eq!(dots.len(), 3);
        assert!(dots[1].has_subsections);
        assert!(!dots[2].has_subsections);
        assert_eq!(s.subsection_counts(), vec![0, 2, 0]);
    }

    #[test]
    fn validation() {
        assert_eq!(Story::from_chapters(vec![]), Err(StoryErrors::EmptyStory));
        assert_eq!(
            Story::from_chapters(vec![chapter(" ", None, vec![])]),
            Err(StoryErrors::MissingChapterId(0))
        );
        assert_eq!(
            Story::from_chapters(vec![chapter("a", None, vec![section("a", None)])]),
            Err(StoryErrors::DuplicateId("a".to_string()))
        );
        assert_eq!(
            Story::from_chapters(vec![
                chapter("a", None, vec![]),
                chapter("b", None, vec![section("", None)])
            ]),
            Err(StoryErrors::MissingSubsectionId {
                chapter: 1,
                subsection: 0
            })
        );
    }
}
