mod report_mixed_states_with_both_strategies;
mod roll_directory_statuses_up_from_children;
mod scan_covers_each_path_exactly_once;
mod scanning_outside_a_repository_fails;
mod staged_rename_reports_removed_and_added;
mod touched_file_stays_normal;
