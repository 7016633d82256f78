use crate::common::repo::repository_dir;
use assert_fs::TempDir;
use emblem::{Repository, ScanError, StrategyKind};
use rstest::rstest;

#[rstest]
fn scanning_outside_a_repository_fails(repository_dir: TempDir) {
    let result = Repository::open_with_strategy(repository_dir.path(), StrategyKind::ContentHash);

    assert!(matches!(result, Err(ScanError::NotARepository { .. })));
}
