use std::{io, path};

use color_eyre::{eyre::eyre, eyre::WrapErr, Help};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::cli::utils;
use crate::cmd;
use crate::resolve;

mod sources;

/// Formats all sources within a set of directories using a clang-format executable.
pub trait ClangFormat {
    /// `directories` are relative to `base_dir`. `version` is the clang-format major version
    /// the project style has been written for.
    fn run_clang_format(
        &self,
        command: &path::Path,
        directories: &[path::PathBuf],
        base_dir: &path::Path,
        version: u32,
    ) -> eyre::Result<()>;
}

/// The cpp-test-anywhere presets that ship alongside the executable.
#[derive(Debug, Clone)]
pub struct Presets {
    root: path::PathBuf,
    mode: cmd::Mode,
}

impl Presets {
    pub fn locate<P>(base_dir: P) -> eyre::Result<Presets>
    where
        P: AsRef<path::Path>,
    {
        let root = utils::dir_or_err(resolve::presets_dir(base_dir))
            .wrap_err("Failed to locate the cpp-test-anywhere presets")
            .suggestion(format!(
                "Please make sure that '{}' is checked out next to the executable, \
                    e.g., using `git submodule update --init`",
                resolve::PRESETS_DIR
            ))?;

        log::trace!("Using presets in {}", root.to_string_lossy());
        Ok(Presets {
            root,
            mode: cmd::Mode::default(),
        })
    }

    pub fn with_mode(self, mode: cmd::Mode) -> Presets {
        Presets { mode, ..self }
    }
}

fn log_pretty() -> bool {
    // fancy logging using indicatif is only done for log level "info". when debugging we
    // do not use a progress bar, if info is not enabled at all ("quiet") then the progress
    // is also not shown
    !log::log_enabled!(log::Level::Debug) && log::log_enabled!(log::Level::Info)
}

struct LogStep(u8);

impl LogStep {
    const STEPS: u8 = 5;

    fn new() -> LogStep {
        LogStep(1)
    }

    fn next(&mut self) -> String {
        let str = format!(
            "{}",
            console::style(format!("[ {:1}/{} ]", self.0, LogStep::STEPS))
                .bold()
                .dim()
        );
        self.0 += 1;
        if log_pretty() {
            str
        } else {
            "".to_string()
        }
    }
}

fn get_command(command: &path::Path, version: u32) -> eyre::Result<cmd::Runner> {
    let suggestion = format!(
        "Please make sure that the command '{}' exists or is in your search path, \
            or provide the path to clang-format {} using --clang-format",
        command.to_string_lossy(),
        version
    );

    let cmd_path = utils::command_or_err(command)
        .wrap_err("Invalid parameter --clang-format")
        .suggestion(suggestion.clone())?;
    let mut cmd = cmd::Runner::new(&cmd_path);

    let found = cmd
        .check()
        .wrap_err(format!(
            "Failed to execute '{}'",
            cmd_path.to_string_lossy()
        ))
        .suggestion(suggestion)?;

    if found.major != version {
        return Err(eyre!(
            "Found clang-format version {} but the style requires version {}",
            found,
            version
        ))
        .wrap_err(format!(
            "Unsupported version of '{}'",
            cmd_path.to_string_lossy()
        ))
        .suggestion(format!(
            "Please install clang-format {} and pass it using --clang-format",
            version
        ));
    }
    Ok(cmd)
}

fn report_failures(mode: cmd::Mode, failures: Vec<(path::PathBuf, io::Error)>) -> eyre::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    let details = failures
        .iter()
        .map(|(path, err)| format!("{}: {}", path.to_string_lossy(), err))
        .collect::<Vec<_>>()
        .join("\n");

    match mode {
        cmd::Mode::Format => Err(eyre!(details))
            .wrap_err(format!("Failed to format {} file(s)", failures.len()))
            .suggestion(
                "Please make sure that your style file matches the version of clang-format \
                    and that you have the necessary permissions to modify all files",
            ),
        cmd::Mode::Check => Err(eyre!(details))
            .wrap_err(format!("{} file(s) are not formatted", failures.len()))
            .suggestion("Run the command without --check to format the files in place"),
    }
}

impl ClangFormat for Presets {
    fn run_clang_format(
        &self,
        command: &path::Path,
        directories: &[path::PathBuf],
        base_dir: &path::Path,
        version: u32,
    ) -> eyre::Result<()> {
        let start = std::time::Instant::now();

        log::info!(" ");
        let mut step = LogStep::new();

        let style = resolve::style(base_dir, &self.root);
        match &style {
            cmd::Style::Path(style_file) => log::info!(
                "{} Using style file {}",
                step.next(),
                console::style(style_file.to_string_lossy()).bold(),
            ),
            cmd::Style::File => log::info!(
                "{} Using the .clang-format style file from the project tree",
                step.next()
            ),
        }

        let (paths, missing) = sources::collect(base_dir, directories)?;
        for directory in missing.iter() {
            log::warn!(
                "Skipping missing directory {}",
                base_dir.join(directory).to_string_lossy()
            );
        }

        log::info!(
            "{} Found {} files with extensions {} in {}",
            step.next(),
            console::style(paths.len()).bold(),
            sources::EXTENSIONS.join(", "),
            directories
                .iter()
                .map(|d| d.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );

        let cmd = get_command(command, version)?;
        log::info!(
            "{} Found clang-format version {} using command {}",
            step.next(),
            console::style(
                cmd.get_version()
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            )
            .bold(),
            console::style(cmd.get_path().to_string_lossy()).bold(),
        );

        let (action, header) = match self.mode {
            cmd::Mode::Format => ("Formatting", "Executing clang-format ...\n"),
            cmd::Mode::Check => ("Checking", "Checking the format ...\n"),
        };
        log::info!("{} {}", step.next(), header);

        let pb = indicatif::ProgressBar::new(paths.len() as u64);
        pb.set_style(
            indicatif::ProgressStyle::with_template(if console::Term::stdout().size().1 > 80 {
                "{prefix:>12.cyan.bold} [{bar:26}] {pos}/{len} {wide_msg}"
            } else {
                "{prefix:>12.cyan.bold} [{bar:26}] {pos}/{len}"
            })
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("=> "),
        );

        if log_pretty() {
            pb.set_prefix("Running");
        } else {
            pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }

        let green_bold = console::Style::new().green().bold();

        let mut failures: Vec<_> = paths
            .par_iter()
            .filter_map(|path| {
                let print_path = path.strip_prefix(base_dir).unwrap_or(path);

                if log_pretty() {
                    pb.println(format!(
                        "{:>12} {}",
                        green_bold.apply_to(action),
                        print_path.to_string_lossy(),
                    ));
                    pb.inc(1);
                } else {
                    log::info!("  + {}", path.to_string_lossy());
                }

                cmd.format(path, &style, self.mode)
                    .err()
                    .map(|err| (path.clone(), err))
            })
            .collect();
        failures.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let duration = start.elapsed();
        if log_pretty() {
            pb.finish_and_clear();
        }
        report_failures(self.mode, failures)?;

        if log_pretty() {
            println!(
                "{:>12} in {}",
                green_bold.apply_to("Finished"),
                indicatif::HumanDuration(duration)
            );
        } else {
            log::info!("{} Finished in {:#?}", step.next(), duration);
        }

        log::info!(" "); // just an empty newline
        Ok(())
    }
}
