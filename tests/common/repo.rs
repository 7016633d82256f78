use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use emblem::{Repository, ScanToken, StatusResult, StatusTag, StrategyKind};
use rstest::fixture;
use std::path::{Path, PathBuf};

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A fresh repository with identity configured but nothing committed
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    git(repository_dir.path(), &["init"]).assert().success();
    git(repository_dir.path(), &["config", "user.name", "fake_user"])
        .assert()
        .success();
    git(
        repository_dir.path(),
        &["config", "user.email", "fake_email@email.com"],
    )
    .assert()
    .success();

    repository_dir
}

/// A repository with a committed baseline: `.gitignore` (`*.tmp`), `1.txt`,
/// `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let repository_dir = init_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join(".gitignore"),
        "*.tmp\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    git(repository_dir.path(), &["add", "."]).assert().success();
    git(repository_dir.path(), &["commit", "-m", "Initial commit"])
        .assert()
        .success();

    repository_dir
}

pub fn git(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Run one full scan with the given strategy, panicking on any scan error
pub async fn scan(dir: &Path, strategy: StrategyKind, paths: &[&str]) -> Vec<StatusResult> {
    let repository =
        Repository::open_with_strategy(dir, strategy).expect("Failed to open repository");
    let requested: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();

    repository
        .status()
        .scan(&requested, &ScanToken::new())
        .await
        .expect("Failed to scan repository")
}

pub fn tag_of(results: &[StatusResult], path: &str) -> StatusTag {
    results
        .iter()
        .find(|result| result.path == Path::new(path))
        .unwrap_or_else(|| panic!("no result for {path}"))
        .tag
}
