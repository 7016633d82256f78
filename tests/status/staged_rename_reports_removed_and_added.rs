use crate::common::file::{FileSpec, write_file};
use crate::common::repo::{committed_repository_dir, git, scan, tag_of};
use assert_fs::TempDir;
use emblem::{StatusTag, StrategyKind};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

// A staged rename covers two paths: the old name left the index, the new one
// is newly staged. Neither side may fall out of the result set.
#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn staged_rename_reports_removed_and_added(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    git(repository_dir.path(), &["mv", "1.txt", "renamed.txt"])
        .assert()
        .success();

    let results = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(tag_of(&results, "1.txt"), StatusTag::Removed);
    assert_eq!(tag_of(&results, "renamed.txt"), StatusTag::Added);
    assert_eq!(tag_of(&results, "."), StatusTag::Added);

    let old_entries = results
        .iter()
        .filter(|result| result.path == Path::new("1.txt"))
        .count();
    assert_eq!(old_entries, 1, "the rename's old path must appear exactly once");
}

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn staged_add_deleted_from_disk_stays_added(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("staged.txt"),
        "staged".to_string(),
    ));
    git(repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success();
    std::fs::remove_file(repository_dir.path().join("staged.txt")).unwrap();

    let results = scan(repository_dir.path(), strategy, &[]).await;

    // never in the tree, so the vanished working copy cannot demote it
    assert_eq!(tag_of(&results, "staged.txt"), StatusTag::Added);
    assert_eq!(tag_of(&results, "."), StatusTag::Added);
}
