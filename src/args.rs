use clap::Parser;

/// Walks through the regional story of the bachelor admissions in Ukraine.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A configuration file in JSON format. The flags below take precedence over
    /// its content. See the manual of the regional_story crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The regional dataset. Setting this option overrides the file given in the
    /// configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, optional) A story in JSON format, replacing the built-in story.
    #[clap(short, long, value_parser)]
    pub story: Option<String>,

    /// (file path, optional) The boundaries of the regions, as GeoJSON or TopoJSON. Only the
    /// properties of the features are used.
    #[clap(short, long, value_parser)]
    pub boundaries: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of every step of the story will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, admstory will check that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Reads navigation commands from the standard input instead of walking the whole story.
    #[clap(long, takes_value = false)]
    pub interactive: bool,

    /// Prints the regions of the boundary file with their dataset names, and exits.
    #[clap(long, takes_value = false)]
    pub list_regions: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
