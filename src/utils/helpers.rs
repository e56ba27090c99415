//! Helpers for filebeam.
//!
//! - Home directory lookup, "~" shortening and expansion for displayed and typed paths
//! - Resolving a typed destination against the current directory
//! - Generating unused filenames so copies never overwrite
//! - Recursive copying that keeps symlinks as symlinks
//! - Running an external program on a path with the terminal released

use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::process::Command;
use std::{fs, io};

/// The user's home directory, if known.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Shortens the home directory prefix of `path` to "~".
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = get_home()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

/// Expands a leading "~" in typed input to the home directory.
pub fn expand_home_path(input: &str) -> PathBuf {
    if input == "~" {
        return get_home().unwrap_or_else(|| PathBuf::from(input));
    }
    if let Some(rest) = input
        .strip_prefix("~/")
        .or_else(|| input.strip_prefix("~\\"))
        && let Some(home) = get_home()
    {
        return home.join(rest);
    }
    PathBuf::from(input)
}

/// Turns prompt input into an absolute path; relative input is taken relative to `cwd`.
pub fn resolve_input_path(input: &str, cwd: &Path) -> PathBuf {
    let path = expand_home_path(input.trim());
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Finds the next available filename by appending _1, _2, etc. if the target exists
///
/// Example: "notes.txt" -> "notes_1.txt"
pub fn get_unused_path(path: &Path) -> PathBuf {
    if path.symlink_metadata().is_err() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path.file_name().unwrap_or_default();

    let stem = Path::new(name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let ext = Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let target = parent.join(format!("{}_{}{}", stem, counter, ext));
        if target.symlink_metadata().is_err() {
            return target;
        }
        counter += 1;
    }
}

/// Recursively copies `src` to `dest`.
///
/// Directories are recreated and their contents copied. Symlinks are copied as links rather than
/// followed, so cycles cannot make the copy run forever.
pub fn copy_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    let md = fs::symlink_metadata(src)?;

    if md.file_type().is_symlink() {
        return copy_symlink(src, dest);
    }

    if md.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dest)
    } else {
        fs::copy(src, dest).map(|_| ())
    }
}

/// True if `program` resolves to an executable on `PATH` (or is a path to one).
pub fn program_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Runs `program path` in the foreground.
///
/// Temporarily disables raw mode and leaves the alternate screen while the program runs,
/// then restores both. A non-zero exit status is reported as an error.
pub fn open_with(program: &str, path: &Path) -> io::Result<()> {
    use crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };

    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    let status = Command::new(program).arg(path).status();

    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;

    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => Err(io::Error::other(format!("{program} exited with {s}"))),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_path_collision_increments() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("data.csv");

        assert_eq!(get_unused_path(&path), path);

        File::create(&path)?;
        assert_eq!(get_unused_path(&path), dir.path().join("data_1.csv"));

        File::create(dir.path().join("data_1.csv"))?;
        assert_eq!(get_unused_path(&path), dir.path().join("data_2.csv"));
        Ok(())
    }

    #[test]
    fn test_hidden_file_collision() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join(".config");

        File::create(&path)?;
        assert_eq!(get_unused_path(&path), dir.path().join(".config_1"));
        Ok(())
    }

    #[test]
    fn test_get_unused_path_no_extension() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let folder_path = dir.path().join("my_folder");

        fs::create_dir(&folder_path)?;
        let path = get_unused_path(&folder_path);

        let fname = path
            .file_name()
            .ok_or("No file name in path")?
            .to_str()
            .ok_or("File name not valid UTF-8")?;
        assert_eq!(fname, "my_folder_1");
        Ok(())
    }

    #[test]
    fn copy_recursive_copies_tree() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("inner"))?;
        File::create(src.join("a.txt"))?.write_all(b"hello")?;
        File::create(src.join("inner").join("b.txt"))?.write_all(b"world")?;

        let dest = dir.path().join("dest");
        copy_recursive(&src, &dest)?;

        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "hello");
        assert_eq!(fs::read_to_string(dest.join("inner").join("b.txt"))?, "world");
        assert!(src.join("a.txt").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copy_recursive_keeps_symlinks() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir(&src)?;
        std::os::unix::fs::symlink("..", src.join("up"))?;

        let dest = dir.path().join("dest");
        copy_recursive(&src, &dest)?;

        let md = fs::symlink_metadata(dest.join("up"))?;
        assert!(md.file_type().is_symlink());
        assert_eq!(fs::read_link(dest.join("up"))?, PathBuf::from(".."));
        Ok(())
    }

    #[test]
    fn relative_input_resolves_against_cwd() {
        let cwd = Path::new("/srv/data");
        assert_eq!(resolve_input_path("sub", cwd), PathBuf::from("/srv/data/sub"));
        assert_eq!(resolve_input_path("  /tmp ", cwd), PathBuf::from("/tmp"));
    }

    #[test]
    fn home_round_trips_through_tilde() {
        if let Some(home) = get_home() {
            assert_eq!(expand_home_path("~"), home);
            assert_eq!(shorten_home_path(&home), "~");
            assert_eq!(expand_home_path("~/docs"), home.join("docs"));
        }
    }
}
