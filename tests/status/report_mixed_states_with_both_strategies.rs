use crate::common::file::{FileSpec, write_file};
use crate::common::repo::{committed_repository_dir, git, scan, tag_of};
use assert_fs::TempDir;
use emblem::{StatusTag, StrategyKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn report_mixed_states(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "modified one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("staged.txt"),
        "staged".to_string(),
    ));
    git(repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("fresh.txt"),
        "fresh".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("junk.tmp"),
        "junk".to_string(),
    ));

    let results = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(tag_of(&results, "1.txt"), StatusTag::Modified);
    assert_eq!(tag_of(&results, "staged.txt"), StatusTag::Added);
    assert_eq!(tag_of(&results, "fresh.txt"), StatusTag::Untracked);
    assert_eq!(tag_of(&results, "junk.tmp"), StatusTag::Ignored);
    assert_eq!(tag_of(&results, ".gitignore"), StatusTag::Normal);
    assert_eq!(tag_of(&results, "a/2.txt"), StatusTag::Normal);
    assert_eq!(tag_of(&results, "a"), StatusTag::Normal);
    assert_eq!(tag_of(&results, "."), StatusTag::Modified);
}

#[rstest]
#[tokio::test]
async fn both_strategies_agree_on_the_full_result_set(committed_repository_dir: TempDir) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "edited two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("fresh.txt"),
        "fresh".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("junk.tmp"),
        "junk".to_string(),
    ));
    std::fs::remove_file(repository_dir.path().join("1.txt")).unwrap();

    let hashed = scan(repository_dir.path(), StrategyKind::ContentHash, &[]).await;
    let tooled = scan(repository_dir.path(), StrategyKind::ToolOutput, &[]).await;

    assert_eq!(hashed, tooled);
}
