use std::{fmt, io, path, process};

/// Whether clang-format rewrites files or only reports deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Format,
    Check,
}

/// Style argument passed to clang-format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    /// `-style=file`, clang-format searches for `.clang-format` next to each source.
    File,
    /// `-style=file:<path>`, an explicit style file (clang-format >= 14).
    Path(path::PathBuf),
}

impl Style {
    fn arg(&self) -> String {
        match self {
            Style::File => "-style=file".to_string(),
            Style::Path(path) => format!("-style=file:{}", path.to_string_lossy()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Version {
    // example output of clang-format:
    // clang-format version 4.0.0 (tags/checker/checker-279)
    // Ubuntu clang-format version 18.1.3 (1ubuntu1)
    fn parse(stdout: &str) -> Option<Version> {
        let re = regex::Regex::new(r".*version ([\d]+)\.([\d]+)\.([\d]+).*").ok()?;
        let caps = re.captures(stdout)?;

        Some(Version {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    cmd: path::PathBuf,
    version: Option<Version>,
}

impl Runner {
    pub fn new<P>(path: P) -> Runner
    where
        P: AsRef<path::Path>,
    {
        let cmd = path::PathBuf::from(path.as_ref());
        Runner { cmd, version: None }
    }

    fn eval_status(status: process::ExitStatus) -> Result<(), io::Error> {
        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Process terminated with code {}", code),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "Process terminated by signal",
            )),
        }
    }

    pub fn get_version(&self) -> Option<Version> {
        self.version
    }

    pub fn get_path(&self) -> path::PathBuf {
        self.cmd.clone()
    }

    pub fn check(&mut self) -> Result<Version, io::Error> {
        let cmd = process::Command::new(self.cmd.as_path())
            .arg("--version")
            .output()?;

        if let Err(err) = Runner::eval_status(cmd.status) {
            log::error!(
                "Execution failed:\n{}",
                String::from_utf8_lossy(&cmd.stderr)
            );
            return Err(err);
        }

        let stdout = String::from_utf8_lossy(&cmd.stdout);
        let version = Version::parse(&stdout).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to match version in '{}'", stdout.trim()),
            )
        })?;

        self.version = Some(version);
        Ok(version)
    }

    pub fn format<P>(&self, file: P, style: &Style, mode: Mode) -> Result<(), io::Error>
    where
        P: AsRef<path::Path>,
    {
        let mut cmd = process::Command::new(self.cmd.as_path());
        match mode {
            Mode::Format => cmd.arg("-i"),
            Mode::Check => cmd.arg("--dry-run"),
        };

        let cmd = cmd
            .arg("--Werror")
            .arg("-fallback-style=none")
            .arg(style.arg())
            .arg(file.as_ref().as_os_str())
            .output()?;

        if let Err(err) = Runner::eval_status(cmd.status) {
            let stderr = String::from_utf8_lossy(&cmd.stderr);

            if !stderr.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{}\n---\n{}---", err, stderr),
                ));
            }
            return Err(err);
        }
        Ok(())
    }
}
