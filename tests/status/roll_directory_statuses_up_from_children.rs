use crate::common::file::{FileSpec, create_directory, write_file};
use crate::common::repo::{committed_repository_dir, scan, tag_of};
use assert_fs::TempDir;
use emblem::{StatusTag, StrategyKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn roll_directory_statuses_up_from_children(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("newdir").join("inside.txt"),
        "inside".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("scratch").join("junk.tmp"),
        "junk".to_string(),
    ));

    let results = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(tag_of(&results, "newdir/inside.txt"), StatusTag::Untracked);
    assert_eq!(tag_of(&results, "newdir"), StatusTag::Untracked);
    assert_eq!(tag_of(&results, "scratch/junk.tmp"), StatusTag::Ignored);
    assert_eq!(tag_of(&results, "scratch"), StatusTag::Ignored);
    // untracked outranks ignored, everything else is normal
    assert_eq!(tag_of(&results, "."), StatusTag::Untracked);
}

#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn empty_directory_stays_normal(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    create_directory(&repository_dir.path().join("hollow"));

    let results = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(tag_of(&results, "hollow"), StatusTag::Normal);
    assert_eq!(tag_of(&results, "."), StatusTag::Normal);
}
