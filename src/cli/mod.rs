pub mod logging;
pub mod utils;

use std::path;

use clap::{arg, crate_authors, crate_description, crate_name, crate_version};

use crate::cmd;

/// Formatter reference used if `--clang-format` is not given, resolved via the search path.
pub const DEFAULT_COMMAND: &str = "clang-format";

#[derive(Debug)]
pub struct Data {
    /// Path to the `clang-format` executable or command name, exactly as provided.
    pub command: path::PathBuf,
    pub mode: cmd::Mode,
}

pub struct Builder {
    pub matches: clap::ArgMatches,
}

impl Builder {
    fn app() -> clap::Command {
        clap::Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
            .arg(
                clap::Arg::new("clang-format")
                    .long("clang-format")
                    .value_name("PATH")
                    .help("Path to clang-format executable (default: system-installed clang-format)")
                    // paths do not necessarily only contain valid UTF-8 characters
                    .value_parser(clap::value_parser!(path::PathBuf))
                    .default_value(DEFAULT_COMMAND)
                    .required(false),
            )
            .arg(arg!(--check "Only check the formatting, do not modify any files"))
            .arg(arg!(-v --verbose ... "Verbosity, use -vv... for verbose output."))
            .arg(arg!(-q --quiet "Suppress all output except for errors; overrides -v"))
    }

    pub fn build() -> Builder {
        let cmd = Builder::app();
        let builder = Builder {
            matches: cmd.get_matches(),
        };
        logging::setup(&builder.matches);
        builder
    }

    /// Parses the given arguments without touching the logger; the first item is the binary name.
    #[cfg(test)]
    pub fn from_args<I, T>(args: I) -> Result<Builder, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Builder::app().try_get_matches_from(args)?;
        Ok(Builder { matches })
    }

    pub fn parse(self) -> eyre::Result<Data> {
        // the formatter reference is passed on unchanged, it is validated once it is executed
        let command = self
            .matches
            .get_one::<path::PathBuf>("clang-format")
            .cloned()
            .ok_or_else(|| eyre::eyre!("Could not convert parameter '--clang-format' to path"))?;

        let mode = match self.matches.get_flag("check") {
            true => cmd::Mode::Check,
            false => cmd::Mode::Format,
        };

        Ok(Data { command, mode })
    }
}
