// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The column holding the region name in the dataset.
pub const REGION_COLUMN: &str = "Region";

/// One row of the regional dataset.
///
/// The values are kept as the raw text found in the source file. Numeric
/// interpretation happens lazily in the metric resolver, so a missing or
/// malformed column never prevents a row from being loaded.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Observation {
    fields: BTreeMap<String, String>,
}

impl Observation {
    pub fn new(fields: BTreeMap<String, String>) -> Observation {
        Observation { fields }
    }

    /// Builds an observation from (column, value) pairs.
    ///
    /// ```
    /// use regional_story::Observation;
    ///
    /// let row = Observation::from_pairs(&[("Region", "Сумська обл."), ("Total_Students", "3120")]);
    /// assert_eq!(row.region(), Some("Сумська обл."));
    /// assert_eq!(row.get("Average_Score"), None);
    /// ```
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Observation {
        Observation {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// The raw value of a column, if the column exists for this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// The raw value of a column, only if it is not the empty string.
    /// Whitespace counts as a value: it parses as zero later on.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|s| !s.is_empty())
    }

    pub fn region(&self) -> Option<&str> {
        self.non_empty(REGION_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

// ********* Map configuration ***********

pub const DEFAULT_METRIC: &str = "Total_Students";
pub const DEFAULT_COLOR_SCHEME: &str = "interpolateViridis";
pub const DEFAULT_TITLE: &str = "Ukrainian Regional Data";

/// What the map displays for a narrative node.
///
/// All the fields are optional: a node only states what differs from the
/// default configuration.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(
        rename = "colorScheme",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MapConfig {
    pub fn new(metric: &str, color_scheme: &str, title: &str) -> MapConfig {
        MapConfig {
            metric: Some(metric.to_string()),
            color_scheme: Some(color_scheme.to_string()),
            title: Some(title.to_string()),
        }
    }
}

/// A map configuration with every field filled in.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMapConfig {
    pub metric: String,
    #[serde(rename = "colorScheme")]
    pub color_scheme: String,
    pub title: String,
}

impl ResolvedMapConfig {
    pub fn default_config() -> ResolvedMapConfig {
        ResolvedMapConfig {
            metric: DEFAULT_METRIC.to_string(),
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Shallow merge: every field present in `over` replaces the current one.
    pub fn merged(self, over: &MapConfig) -> ResolvedMapConfig {
        ResolvedMapConfig {
            metric: over.metric.clone().unwrap_or(self.metric),
            color_scheme: over.color_scheme.clone().unwrap_or(self.color_scheme),
            title: over.title.clone().unwrap_or(self.title),
        }
    }
}

// ********* Navigation ***********

/// The position of the reader in the story.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Serialize)]
pub struct Cursor {
    pub chapter: usize,
    pub subsection: usize,
    #[serde(rename = "inSubsectionMode")]
    pub in_subsection_mode: bool,
}

/// Durations the surface may use to animate a chapter change.
///
/// The navigator itself never waits: these are only handed over to whoever
/// drives `commit` and `settle`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TransitionTimings {
    pub fade_out_ms: u64,
    pub settle_ms: u64,
}

impl TransitionTimings {
    pub const DEFAULT: TransitionTimings = TransitionTimings {
        fade_out_ms: 400,
        settle_ms: 100,
    };

    pub const INSTANT: TransitionTimings = TransitionTimings {
        fade_out_ms: 0,
        settle_ms: 0,
    };
}

// ******** Errors *********

/// Errors found while assembling a story.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StoryErrors {
    EmptyStory,
    MissingChapterId(usize),
    MissingSubsectionId { chapter: usize, subsection: usize },
    DuplicateId(String),
    SubsectionWithoutChapter(String),
}

impl Error for StoryErrors {}

impl Display for StoryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryErrors::EmptyStory => write!(f, "the story does not contain any chapter"),
            StoryErrors::MissingChapterId(idx) => write!(f, "chapter {} has an empty id", idx),
            StoryErrors::MissingSubsectionId {
                chapter,
                subsection,
            } => write!(
                f,
                "subsection {} of chapter {} has an empty id",
                subsection, chapter
            ),
            StoryErrors::DuplicateId(id) => write!(f, "the id {:?} is used more than once", id),
            StoryErrors::SubsectionWithoutChapter(id) => {
                write!(f, "subsection {:?} does not belong to any chapter", id)
            }
        }
    }
}
