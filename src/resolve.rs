use std::path;

use crate::cli::utils;
use crate::cmd;

use color_eyre::{eyre::eyre, eyre::WrapErr};

/// Location of the cpp-test-anywhere presets, relative to the base directory.
pub const PRESETS_DIR: &str = "cpp-test-anywhere/cmake-presets";

const STYLE_FILE: &str = ".clang-format";

/// The symlink-free directory containing the running executable. All directories that are
/// formatted are anchored here, never at the current working directory.
pub fn base_dir() -> eyre::Result<path::PathBuf> {
    let exe = std::env::current_exe().wrap_err("Failed to determine the path of the executable")?;
    let exe = exe.canonicalize().wrap_err(format!(
        "Failed to resolve the path of the executable '{}'",
        exe.to_string_lossy()
    ))?;

    exe.parent().map(path::PathBuf::from).ok_or_else(|| {
        eyre!(
            "Executable '{}' has no parent directory",
            exe.to_string_lossy()
        )
    })
}

pub fn presets_dir<P>(base_dir: P) -> path::PathBuf
where
    P: AsRef<path::Path>,
{
    base_dir.as_ref().join(PRESETS_DIR)
}

/// A style file within the project tree always takes precedence, clang-format picks it up by
/// itself. Otherwise the presets provide the style, if they contain one.
pub fn style<P, Q>(base_dir: P, presets_dir: Q) -> cmd::Style
where
    P: AsRef<path::Path>,
    Q: AsRef<path::Path>,
{
    if utils::file_or_err(base_dir.as_ref().join(STYLE_FILE)).is_ok() {
        return cmd::Style::File;
    }

    match utils::file_or_err(presets_dir.as_ref().join(STYLE_FILE)) {
        Ok(path) => cmd::Style::Path(path),
        Err(_) => {
            log::debug!(
                "No style file found in '{}' or '{}'",
                base_dir.as_ref().to_string_lossy(),
                presets_dir.as_ref().to_string_lossy()
            );
            cmd::Style::File
        }
    }
}
