use crate::common::repo::{committed_repository_dir, scan, tag_of};
use assert_fs::TempDir;
use emblem::{StatusTag, StrategyKind};
use filetime::FileTime;
use pretty_assertions::assert_eq;
use rstest::rstest;

// A changed timestamp with unchanged content is not a modification; both
// strategies compare content, not metadata.
#[rstest]
#[case::content_hash(StrategyKind::ContentHash)]
#[case::tool_output(StrategyKind::ToolOutput)]
#[tokio::test]
async fn touched_file_stays_normal(
    committed_repository_dir: TempDir,
    #[case] strategy: StrategyKind,
) {
    let repository_dir = committed_repository_dir;

    let touched = repository_dir.path().join("1.txt");
    let in_the_future = FileTime::from_unix_time(FileTime::now().unix_seconds() + 3600, 0);
    filetime::set_file_mtime(&touched, in_the_future).unwrap();

    let results = scan(repository_dir.path(), strategy, &[]).await;

    assert_eq!(tag_of(&results, "1.txt"), StatusTag::Normal);
    assert_eq!(tag_of(&results, "."), StatusTag::Normal);
}
