//! Domain logic - pure versioning rules independent of git and the filesystem

pub mod changelog;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use changelog::{Changelog, ChangelogEntry, ChangelogEntryData};
pub use commit::{ConventionalCommit, ConventionalCommitData};
pub use prerelease::Identifier;
pub use tag::{format_template, VersionTag};
pub use version::{Version, VersionComponent};
