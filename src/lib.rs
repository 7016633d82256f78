//! Working-tree status resolution engine
//!
//! Answers one question for any path inside a repository: which emblem does
//! it deserve right now? Paths are classified by three-way comparison of the
//! committed tree, the staging index and the working directory (or by parsing
//! the output of an external git binary when one is available), ignore rules
//! are layered the way git layers them, and directory statuses roll up from
//! their children.
//!
//! ```no_run
//! use emblem::{Repository, ScanToken};
//!
//! # async fn demo() -> emblem::Result<()> {
//! let repository = Repository::discover(std::path::Path::new(".")).await?;
//! let results = repository.status().scan(&[], &ScanToken::new()).await?;
//! for result in results {
//!     println!("{} {}", result.tag.identifier(), result.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod error;

pub use areas::repository::Repository;
pub use artifacts::status::Scanner;
pub use artifacts::status::result::{FileKind, StatusResult, StatusTag};
pub use artifacts::status::strategy::{ScanToken, StrategyKind};
pub use error::{Result, ScanError};
