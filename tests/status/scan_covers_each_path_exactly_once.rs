use crate::common::file::{FileSpec, write_file, write_generated_files};
use crate::common::repo::{committed_repository_dir, scan, tag_of};
use assert_fs::TempDir;
use emblem::{StatusTag, StrategyKind};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn scan_covers_each_path_exactly_once(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("fresh.txt"),
        "fresh".to_string(),
    ));

    let results = scan(repository_dir.path(), strategy, &[]).await;

    let paths: Vec<_> = results.iter().map(|result| result.path.clone()).collect();
    let mut deduplicated = paths.clone();
    deduplicated.dedup();
    assert_eq!(paths, deduplicated, "a path was reported twice");

    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted, "results are not in path order");

    assert!(paths.contains(&Path::new(".").to_path_buf()));
    assert!(paths.contains(&Path::new("a/b/3.txt").to_path_buf()));
}

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn every_generated_file_gets_exactly_one_result(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    let generated = write_generated_files(&repository_dir.path().join("bulk"), 20);

    let results = scan(repository_dir.path(), strategy, &[]).await;

    for file_spec in &generated {
        let rel = file_spec.path.strip_prefix(repository_dir.path()).unwrap();
        let matching: Vec<_> = results
            .iter()
            .filter(|result| result.path == rel)
            .collect();
        assert_eq!(matching.len(), 1, "{} reported {} times", rel.display(), matching.len());
        assert_eq!(matching[0].tag, StatusTag::Untracked);
    }
}

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn repeated_scans_are_identical(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "modified one".to_string(),
    ));

    let first = scan(repository_dir.path(), strategy, &[]).await;
    let second = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(first, second);
}

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn subtree_scan_excludes_outside_paths_but_finds_deleted_ones(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "modified one".to_string(),
    ));
    std::fs::remove_file(repository_dir.path().join("a/b/3.txt")).unwrap();

    let results = scan(repository_dir.path(), strategy, &["a"]).await;

    let paths: Vec<_> = results.iter().map(|result| result.path.clone()).collect();
    assert!(!paths.contains(&Path::new("1.txt").to_path_buf()));
    assert_eq!(tag_of(&results, "a/b/3.txt"), StatusTag::Missing);
    assert_eq!(tag_of(&results, "a/2.txt"), StatusTag::Normal);
}
