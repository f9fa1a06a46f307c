use std::path;

use color_eyre::eyre::WrapErr;

/// Extensions of the sources that are formatted.
pub const EXTENSIONS: [&str; 2] = ["hpp", "cpp"];

fn pattern_for<P>(directory: P) -> String
where
    P: AsRef<path::Path>,
{
    // globmatch expects '/' as separator on all platforms
    let directory = directory.as_ref().to_string_lossy().replace('\\', "/");
    let directory = directory.trim_end_matches('/');
    format!("{}/**/*.{{{}}}", directory, EXTENSIONS.join(","))
}

fn build_matchers<'a, P>(
    patterns: &'a [String],
    root: P,
) -> eyre::Result<Vec<globmatch::Matcher<'a, path::PathBuf>>>
where
    P: AsRef<path::Path>,
{
    let candidates: Vec<Result<_, String>> = patterns
        .iter()
        .map(|pattern| {
            globmatch::Builder::new(pattern)
                .case_sensitive(true)
                .build(root.as_ref())
        })
        .collect();

    let failures: Vec<_> = candidates
        .iter()
        .filter_map(|f| f.as_ref().err())
        .collect();

    if !failures.is_empty() {
        eyre::bail!(
            "Failed to compile patterns: \n{}",
            failures
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
    Ok(candidates.into_iter().flatten().collect())
}

/// Recursively collects all sources with one of the `EXTENSIONS` within `directories`. Each
/// directory is walked from `root`, i.e., the base directory, never from the working directory.
/// Returns the sorted list of sources and the list of directories that do not exist.
pub fn collect<P>(
    root: P,
    directories: &[path::PathBuf],
) -> eyre::Result<(Vec<path::PathBuf>, Vec<path::PathBuf>)>
where
    P: AsRef<path::Path>,
{
    let (existing, missing): (Vec<_>, Vec<_>) = directories
        .iter()
        .cloned()
        .partition(|directory| root.as_ref().join(directory).is_dir());

    // the matchers borrow their patterns until the directories have been walked
    let patterns: Vec<String> = existing.iter().map(pattern_for).collect();
    let candidates = build_matchers(&patterns, root.as_ref())
        .wrap_err("Failed to build search patterns for the source directories")?;

    let mut paths: Vec<_> = candidates
        .into_iter()
        .flat_map(|m| {
            m.into_iter()
                .filter_entry(|p| !globmatch::is_hidden_entry(p))
                .flatten()
                .collect::<Vec<_>>()
        })
        .filter(|path| path.as_path().is_file()) // accept only files
        .filter_map(|path| path.canonicalize().ok())
        .collect();

    paths.sort_unstable();
    paths.dedup();

    log::debug!(
        "paths \n{}",
        paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    );

    Ok((paths, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &path::Path, file: &str) {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "int main() { return 0; }\n").unwrap();
    }

    // the default prefix ".tmp" would mark the whole tree as hidden
    fn tempdir() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("format_lib")
            .tempdir()
            .unwrap()
    }

    #[test]
    fn test_pattern() {
        assert_eq!("inc/**/*.{hpp,cpp}", pattern_for("inc"));
        assert_eq!("src/app/**/*.{hpp,cpp}", pattern_for("src/app/"));
    }

    #[test]
    fn test_build_matchers() {
        let tmp = tempdir();
        let root = tmp.path();
        touch(root, "inc/myb/myb.hpp");
        touch(root, "src/app/myb_app.hpp");

        let patterns: Vec<String> = ["inc", "src/app"].iter().map(pattern_for).collect();
        let matchers = build_matchers(&patterns, root).unwrap();
        assert_eq!(2, matchers.len());

        let mut found: Vec<_> = matchers
            .into_iter()
            .flat_map(|m| m.into_iter().flatten().collect::<Vec<_>>())
            .filter_map(|p| p.canonicalize().ok())
            .collect();
        found.sort_unstable();

        let root = root.canonicalize().unwrap();
        assert_eq!(
            vec![root.join("inc/myb/myb.hpp"), root.join("src/app/myb_app.hpp")],
            found
        );
    }

    #[test]
    fn test_collect() {
        let tmp = tempdir();
        let root = tmp.path();

        touch(root, "inc/myb/myb.hpp");
        touch(root, "src/my_buttons.cpp");
        touch(root, "src/app/myb_app.hpp");
        touch(root, "src/notes.txt");
        touch(root, "src/legacy.c");
        touch(root, "src/.hidden/skipped.cpp");
        touch(root, "other/ignored.cpp");
        touch(root, "top.cpp");

        let directories = vec![path::PathBuf::from("inc"), path::PathBuf::from("src")];
        let (paths, missing) = collect(root, &directories).unwrap();

        let expected: Vec<_> = vec![
            "inc/myb/myb.hpp",
            "src/app/myb_app.hpp",
            "src/my_buttons.cpp",
        ]
        .into_iter()
        .map(|p| root.canonicalize().unwrap().join(p))
        .collect();

        assert_eq!(expected, paths);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_collect_missing() {
        let tmp = tempdir();
        let root = tmp.path();
        touch(root, "src/main.cpp");

        let directories = vec![path::PathBuf::from("inc"), path::PathBuf::from("src")];
        let (paths, missing) = collect(root, &directories).unwrap();

        assert_eq!(
            vec![root.canonicalize().unwrap().join("src/main.cpp")],
            paths
        );
        assert_eq!(vec![path::PathBuf::from("inc")], missing);

        // no directory at all is not an error
        let (paths, missing) = collect(root.join("nowhere"), &directories).unwrap();
        assert!(paths.is_empty());
        assert_eq!(directories, missing);
    }
}
