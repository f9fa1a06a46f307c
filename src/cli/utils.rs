use std::{fs, path};

use color_eyre::{eyre::eyre, eyre::WrapErr};

pub fn path_or_err<P>(path: P) -> eyre::Result<path::PathBuf>
where
    P: AsRef<path::Path>,
{
    let path_as_buf = path::PathBuf::from(path.as_ref());

    if !path_as_buf.exists() {
        return Err(eyre!("Path not found or permission denied"))
            .wrap_err(format!("'{}' is not a path", path_as_buf.to_string_lossy()));
    }

    Ok(path_as_buf)
}

pub fn file_or_err<P>(path: P) -> eyre::Result<path::PathBuf>
where
    P: AsRef<path::Path>,
{
    let path_as_buf = path::PathBuf::from(path.as_ref());

    if !path_as_buf.is_file() {
        return Err(eyre!("File not found or permission denied"))
            .wrap_err(format!("'{}' is not a file", path_as_buf.to_string_lossy()));
    }

    Ok(path_as_buf)
}

pub fn dir_or_err<P>(path: P) -> eyre::Result<path::PathBuf>
where
    P: AsRef<path::Path>,
{
    let path_as_buf = path::PathBuf::from(path.as_ref());
    let meta = fs::metadata(path.as_ref()).wrap_err(format!(
        "'{}' is not a directory",
        path_as_buf.to_string_lossy()
    ))?;

    if !meta.is_dir() {
        return Err(eyre!("Directory not found")).wrap_err(format!(
            "'{}' is not a directory",
            path_as_buf.to_string_lossy()
        ));
    }

    Ok(path_as_buf)
}

/// A command consisting of a single component is a name that is looked up in the
/// search path when executed. Anything else is treated as a path and must exist.
pub fn command_or_err<P>(path: P) -> eyre::Result<path::PathBuf>
where
    P: AsRef<path::Path>,
{
    let path = path.as_ref();
    if is_command_name(path) {
        return Ok(path::PathBuf::from(path));
    }
    path_or_err(path)
}

fn is_command_name(path: &path::Path) -> bool {
    path.components().count() == 1
        && matches!(path.components().next(), Some(path::Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        let combinations = vec![
            ("clang-format", true),
            ("clang-format-18", true),
            ("clang-format.exe", true),
            ("some/path/to/clang-format", false),
            ("./clang-format", false),
            ("..", false),
        ];

        for (path, is_name) in combinations.into_iter() {
            println!("checking {}", path);
            assert_eq!(is_name, is_command_name(path::Path::new(path)));
        }
    }

    #[test]
    fn test_command_or_err() {
        // names are not validated, they are resolved via $PATH at execution time
        assert!(command_or_err("i-do-not-exist").is_ok());
        assert!(command_or_err("i/do/not/exist/clang-format").is_err());
    }

    #[test]
    fn test_dir_or_err() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "").unwrap();

        assert!(dir_or_err(tmp.path()).is_ok());
        assert!(dir_or_err(&file).is_err());
        assert!(dir_or_err(tmp.path().join("missing")).is_err());

        assert!(file_or_err(&file).is_ok());
        assert!(file_or_err(tmp.path()).is_err());
    }
}
