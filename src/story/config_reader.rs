use crate::story::*;

use regional_story::{Chapter, Story, TransitionTimings};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transitions {
    #[serde(rename = "fadeOutMs")]
    pub fade_out_ms: Option<u64>,
    #[serde(rename = "settleMs")]
    pub settle_ms: Option<u64>,
}

impl Transitions {
    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings {
            fade_out_ms: self
                .fade_out_ms
                .unwrap_or(TransitionTimings::DEFAULT.fade_out_ms),
            settle_ms: self.settle_ms.unwrap_or(TransitionTimings::DEFAULT.settle_ms),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource", default)]
    pub data_source: DataSource,
    #[serde(rename = "storyFile")]
    pub story_file: Option<String>,
    #[serde(rename = "boundariesFile")]
    pub boundaries_file: Option<String>,
    #[serde(default)]
    pub transitions: Transitions,
}

fn read_json(path: &str) -> StoryResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

pub fn read_run_config(path: &str) -> StoryResult<RunConfig> {
    let js = read_json(path)?;
    let config: RunConfig = serde_json::from_value(js).context(ParsingJsonSnafu { path })?;
    debug!("read_run_config: {:?}", config);
    Ok(config)
}

/// Reads a story file: a JSON array of chapters.
pub fn read_story_file(path: &str) -> StoryResult<Story> {
    let js = read_json(path)?;
    let chapters: Vec<Chapter> = serde_json::from_value(js).context(ParsingJsonSnafu { path })?;
    info!(
        "read_story_file: {:?}: {} chapters",
        simplify_file_name(path),
        chapters.len()
    );
    Story::from_chapters(chapters).context(InvalidStorySnafu { path })
}

pub fn read_summary(path: &str) -> StoryResult<JSValue> {
    read_json(path)
}
