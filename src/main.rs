mod cli;
mod cmd;
mod presets;
mod resolve;

use std::path;

use presets::ClangFormat;

/// Directories containing the library's headers and sources, relative to the base directory.
const DIRECTORIES: [&str; 2] = ["inc", "src"];

/// Major version of clang-format that the presets' style file is written for.
const CLANG_FORMAT_VERSION: u32 = 18;

fn run<H>(data: &cli::Data, base_dir: &path::Path, helper: &H) -> eyre::Result<()>
where
    H: ClangFormat,
{
    let directories: Vec<_> = DIRECTORIES.iter().map(path::PathBuf::from).collect();

    log::debug!(
        "Formatting {:?} in {} using '{}'",
        directories,
        base_dir.to_string_lossy(),
        data.command.to_string_lossy()
    );
    helper.run_clang_format(&data.command, &directories, base_dir, CLANG_FORMAT_VERSION)
}

fn main() -> eyre::Result<()> {
    cli::logging::install_hooks()?;

    // the presets are a hard requirement and are checked before the arguments are parsed
    let base_dir = resolve::base_dir()?;
    let presets = presets::Presets::locate(&base_dir)?;

    let data = cli::Builder::build().parse()?;
    run(&data, &base_dir, &presets.with_mode(data.mode))
}
