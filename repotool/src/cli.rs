use clap::{Args, Parser, Subcommand, ValueEnum};
use repocommon::print;

/// Helper tool for the testrepo fixtures
#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(bin_name = "testrepo")]
pub struct Cli {
    /// Top level options
    #[clap(flatten)]
    pub top: TopLevelOptions,

    /// Subcommand
    #[clap(subcommand)]
    pub command: Command,

    /// Common options
    #[clap(flatten)]
    pub options: CommonOptions,
}

/// Top level options
#[derive(Debug, Clone, PartialEq, Args)]
pub struct TopLevelOptions {
    /// Directory to look for Testrepo.toml in
    #[clap(short('C'), long, default_value = ".")]
    pub dir: String,
}

impl Cli {
    pub fn apply_print_options(&self) {
        if self.is_verbose_on() {
            print::verbose_on();
        }

        match (&self.command.color, &self.options.color) {
            (Some(ColorOption::Never), _) | (None, Some(ColorOption::Never)) => {
                print::color_off();
            }
            (Some(ColorOption::Always), _) | (None, Some(ColorOption::Always)) => {
                // color is already on by default
            }
            _ => print::auto_color(),
        }
    }

    #[inline]
    pub fn is_verbose_on(&self) -> bool {
        self.options.verbose || self.command.verbose
    }

    #[inline]
    pub fn is_trace_on(&self) -> bool {
        self.options.trace || self.command.trace
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Check if a URL is up
    Ping(crate::cmd_ping::Options),
    /// Convert plenary test output on stdin to a JUnit XML report on stdout
    ///
    /// Exits with 1 if the report contains failures
    Junit(CommonOptions),
    /// Print the terminal size of stdout
    Stdoutinfo(CommonOptions),
}

impl std::ops::Deref for Command {
    type Target = CommonOptions;

    fn deref(&self) -> &Self::Target {
        match self {
            Command::Ping(x) => x,
            Command::Junit(x) => x,
            Command::Stdoutinfo(x) => x,
        }
    }
}

/// Common options for all commands
#[derive(Debug, Clone, PartialEq, Args)]
pub struct CommonOptions {
    /// Enable verbose output
    #[clap(short = 'V', long)]
    pub verbose: bool,

    /// Enable error trace
    #[clap(short = 'T', long)]
    pub trace: bool,

    /// Set output color option
    ///
    /// By default, color is enabled when stderr is terminal
    #[clap(long)]
    pub color: Option<ColorOption>,
}

/// Color options for output
#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum ColorOption {
    Always,
    Never,
}
