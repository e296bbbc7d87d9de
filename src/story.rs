use log::{debug, info, warn};

use regional_story::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::story::boundaries::{load_features, region_listing};
use crate::story::config_reader::*;
use crate::story::io_common::*;

pub mod boundaries;
pub mod config_reader;
pub mod interactive;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod render;

#[derive(Debug, Snafu)]
pub enum StoryError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} does not contain a worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the standard input"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("Invalid story in {path}"))]
    InvalidStory { source: StoryErrors, path: String },
    #[snafu(display("Unknown input type {provider:?}, expected csv or xlsx"))]
    UnknownProvider { provider: String },
    #[snafu(display("No input file: use --input or the dataSource section of the configuration"))]
    MissingInput {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type StoryResult<T> = Result<T, StoryError>;

const BUILTIN_STORY: &str = "(built-in story)";
const COMPUTED_SUMMARY: &str = "(computed summary)";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn parse(provider: &str) -> StoryResult<InputType> {
        match provider {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            x => UnknownProviderSnafu { provider: x }.fail(),
        }
    }
}

/// The settings of a run, once the command line and the configuration file
/// are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub title: Option<String>,
    pub input: Option<String>,
    pub input_type: InputType,
    pub worksheet: Option<String>,
    pub story: Option<String>,
    pub boundaries: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub timings: TransitionTimings,
}

impl RunSettings {
    /// The command line wins over the configuration. Paths of the
    /// configuration are relative to its directory.
    pub fn new(args: &Args, config: &RunConfig, root: Option<&Path>) -> StoryResult<RunSettings> {
        let from_config = |p: &Option<String>| p.as_ref().map(|s| resolve_path(root, s));
        let provider = args
            .input_type
            .clone()
            .or_else(|| config.data_source.provider.clone())
            .unwrap_or_else(|| "csv".to_string());
        Ok(RunSettings {
            title: config.output_settings.title.clone(),
            input: args
                .input
                .clone()
                .or_else(|| from_config(&config.data_source.file_path)),
            input_type: InputType::parse(provider.as_str())?,
            worksheet: args
                .excel_worksheet_name
                .clone()
                .or_else(|| config.data_source.worksheet_name.clone()),
            story: args
                .story
                .clone()
                .or_else(|| from_config(&config.story_file)),
            boundaries: args
                .boundaries
                .clone()
                .or_else(|| from_config(&config.boundaries_file)),
            out: args
                .out
                .clone()
                .or_else(|| from_config(&config.output_settings.output_path)),
            reference: args.reference.clone(),
            timings: config.transitions.timings(),
        })
    }
}

fn read_dataset(settings: &RunSettings) -> StoryResult<Vec<Observation>> {
    let path = match &settings.input {
        Some(p) => p.as_str(),
        None => return MissingInputSnafu {}.fail(),
    };
    info!("Attempting to read dataset {:?}", path);
    let rows = match settings.input_type {
        InputType::Csv => io_csv::read_csv_dataset(path)?,
        InputType::Xlsx => io_excel::read_excel_dataset(path, settings.worksheet.as_deref())?,
    };
    let mut columns: Vec<&String> = rows.iter().flat_map(|r| r.columns()).collect();
    columns.sort();
    columns.dedup();
    info!("Dataset loaded: {} rows, columns: {:?}", rows.len(), columns);
    Ok(rows)
}

fn load_story(settings: &RunSettings) -> StoryResult<Story> {
    match &settings.story {
        Some(p) => read_story_file(p),
        None => Story::builtin().context(InvalidStorySnafu {
            path: BUILTIN_STORY,
        }),
    }
}

/// Visits every step of the story in reading order, starting from the state
/// reached once the data is loaded.
pub fn walk_story(story: &Story) -> Vec<Cursor> {
    let mut nav = Navigator::new(story);
    nav.initialize();
    nav.finish_transition();
    let mut res: Vec<Cursor> = vec![nav.cursor()];
    while nav.next() {
        nav.finish_transition();
        res.push(nav.cursor());
    }
    res
}

pub fn build_summary_js(settings: &RunSettings, story: &Story, rows: &[Observation]) -> JSValue {
    let title = settings.title.clone().or_else(|| {
        story
            .chapters()
            .first()
            .map(|c| c.title.clone())
    });
    let steps: Vec<JSValue> = walk_story(story)
        .iter()
        .map(|c| render::step_summary(story, c, rows))
        .collect();
    json!({
        "title": title,
        "rows": rows.len(),
        "chapters": story.indicators(),
        "stats": panel_summary(rows),
        "steps": steps,
    })
}

fn write_output(out: &str, pretty_js: &str) -> StoryResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
        return Ok(());
    }
    let mut file = fs::File::create(out).context(WritingOutputSnafu { path: out })?;
    writeln!(file, "{}", pretty_js).context(WritingOutputSnafu { path: out })?;
    info!("Summary written to {:?}", out);
    Ok(())
}

fn check_reference(reference: &str, pretty_js: &str) -> StoryResult<()> {
    let summary_ref = read_summary(reference)?;
    let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    // Both sides go through the same parser before being compared.
    let summary: JSValue = serde_json::from_str(pretty_js).context(ParsingJsonSnafu {
        path: COMPUTED_SUMMARY,
    })?;
    let pretty_js = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    let pretty_js = pretty_js.as_str();
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("The summary matches the reference {:?}", simplify_file_name(reference));
    Ok(())
}

pub fn run_story(args: &Args) -> StoryResult<()> {
    let (config, root) = match &args.config {
        Some(p) => {
            let config = read_run_config(p)?;
            (config, Path::new(p).parent())
        }
        None => (RunConfig::default(), None),
    };
    let settings = RunSettings::new(args, &config, root)?;
    debug!("run_story: settings: {:?}", settings);

    let features = load_features(settings.boundaries.as_deref())?;
    if args.list_regions {
        for line in region_listing(&features) {
            println!("{}", line);
        }
        return Ok(());
    }

    let rows = read_dataset(&settings)?;
    let story = load_story(&settings)?;

    if args.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut session = interactive::Session::new(
            &story,
            &rows,
            &features,
            settings.timings,
            stdout.lock(),
        );
        return session.run(stdin.lock());
    }

    for cursor in walk_story(&story) {
        println!("{}\n", render::render_step(&story, &cursor, &rows, &features));
    }

    if settings.out.is_none() && settings.reference.is_none() {
        return Ok(());
    }
    let summary_js = build_summary_js(&settings, &story, &rows);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(SerializingJsonSnafu {})?;
    if let Some(out) = &settings.out {
        write_output(out, &pretty_js)?;
    }
    if let Some(reference) = &settings.reference {
        check_reference(reference, &pretty_js)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_data(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}
