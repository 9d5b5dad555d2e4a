use std::path::PathBuf;

use clap::Parser;
use mw_core::Access;

/// Top-level CLI parser for the `mockwright` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mockwright",
    version,
    about = "Turn C++ interface headers into mock specifications"
)]
pub struct Cli {
    /// C++ header declaring the interfaces to mock
    #[arg(required_unless_present = "schema")]
    pub header: Option<PathBuf>,

    /// Directory receiving `<mock>.mockspec.json` files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Location of the C++ parser library
    #[arg(long, env = "MOCKWRIGHT_PARSER_LIBRARY")]
    pub parser_library: Option<PathBuf>,

    /// Regex selecting the classes to mock (matched at the start of the name)
    #[arg(short = 'c', long = "class")]
    pub class_pattern: Option<String>,

    /// Mock class name; `\1` is replaced by the first group of --class
    #[arg(long)]
    pub mock_class: Option<String>,

    /// Namespace of the mocks; a leading `::` makes it absolute
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Access levels of the methods to mock (pure virtuals are always mocked)
    #[arg(short, long, value_delimiter = ',')]
    pub access: Option<Vec<Access>>,

    /// Name of the member exposing the mock objects
    #[arg(long)]
    pub controller: Option<String>,

    /// Config file replacing `.mockwright/config.toml`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log syntax errors and keep going instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Print the specs as a JSON array instead of writing files
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Print the syntax tree of the header and exit
    #[arg(long)]
    pub dump_tree: bool,

    /// Print the JSON Schema of a mock spec and exit
    #[arg(long)]
    pub schema: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}
