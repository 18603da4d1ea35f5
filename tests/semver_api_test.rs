use bumpify::config::{ChangelogFile, SemVerConfig};
use bumpify::domain::{ChangelogEntry, ChangelogEntryData, ConventionalCommit, Version};
use bumpify::fs::DirFileSystem;
use bumpify::git::mock::{make_commit, mock_timestamp};
use bumpify::git::MockRepository;
use bumpify::render::render_as_markdown;
use bumpify::semver_api::SemVerApi;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, SemVerApi<MockRepository, DirFileSystem>) {
    let dir = TempDir::new().unwrap();
    let mut config = SemVerConfig::default();
    config.changelog_files = vec![
        ChangelogFile::new("CHANGELOG.md"),
        ChangelogFile::new("CHANGELOG.json"),
    ];
    let fs = DirFileSystem::new(dir.path());
    (dir, SemVerApi::new(config, MockRepository::new(), fs))
}

fn conventional(message: &str) -> ConventionalCommit {
    ConventionalCommit::from_commit(make_commit(message)).unwrap()
}

#[test]
fn test_changelog_from_three_tags() {
    let (_dir, api) = setup();
    let repo = api.repo();
    repo.add_commit("chore: initial commit");
    repo.add_tag("v0.1.0");
    repo.add_commit("feat: a feature");
    repo.add_commit("fix: a fix");
    repo.add_tag("v0.2.0");
    repo.add_commit("fix!: a breaking fix");
    repo.add_tag("v1.0.0");

    let tags = api.list_version_tags().unwrap();
    let changelog = api.fetch_changelog(&tags).unwrap();

    assert_eq!(changelog.entries.len(), 3);
    assert_eq!(changelog.entries[0].prev_version, None);
    assert_eq!(changelog.entries[0].data, None);
    assert_eq!(changelog.entries[1].prev_version, Some(Version::new(0, 1, 0)));
    assert_eq!(changelog.entries[2].prev_version, Some(Version::new(0, 2, 0)));

    let last = changelog.entries[2].data.as_ref().unwrap();
    assert_eq!(last.breaking_changes(), vec!["a breaking fix"]);

    assert_eq!(
        render_as_markdown(&changelog),
        "## 1.0.0 (1999-01-04)\n\n\
         ### BREAKING CHANGES\n\n\
         - a breaking fix\n\n\
         ### Fix\n\n\
         - a breaking fix\n\n\
         ## 0.2.0 (1999-01-03)\n\n\
         ### Fix\n\n\
         - a fix\n\n\
         ### Feat\n\n\
         - a feature\n\n\
         ## 0.1.0 (1999-01-01)\n\n\
         Initial release.\n\n"
    );
}

#[test]
fn test_update_changelog_files_with_breaking_changes_from_other_types() {
    let (dir, api) = setup();
    let changelog = bumpify::domain::Changelog::new(vec![
        ChangelogEntry {
            version: Some(Version::new(0, 0, 1)),
            released: Some(mock_timestamp(0)),
            ..Default::default()
        },
        ChangelogEntry {
            version: Some(Version::new(0, 0, 2)),
            prev_version: Some(Version::new(0, 0, 1)),
            released: Some(mock_timestamp(1)),
            data: ChangelogEntryData::from_conventional_commit_list(&[
                conventional("fix: a fix"),
                conventional("feat: first feat"),
                conventional("feat: second feat"),
                conventional("test!: a breaking test"),
                conventional("chore: spam\n\nBREAKING CHANGE: another breaking change"),
            ]),
        },
    ]);

    api.update_changelog_files(&changelog).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "## 0.0.2 (1999-01-02)\n\n\
         ### BREAKING CHANGES\n\n\
         - a breaking test\n\
         - another breaking change\n\n\
         ### Fix\n\n\
         - a fix\n\n\
         ### Feat\n\n\
         - first feat\n\
         - second feat\n\n\
         ## 0.0.1 (1999-01-01)\n\n\
         Initial release.\n\n"
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("CHANGELOG.json")).unwrap())
            .unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].get("prev_version").is_none());
    assert!(entries[0].get("data").is_none());
    assert_eq!(entries[1]["released"], "1999-01-02T00:00:00");
    let others = entries[1]["data"]["others"].as_object().unwrap();
    assert_eq!(others.len(), 2);
    assert_eq!(
        others["chore"][0]["data"]["breaking_changes"],
        serde_json::json!(["another breaking change"])
    );
}

#[test]
fn test_unreleased_changes_after_latest_tag() {
    let (_dir, api) = setup();
    let repo = api.repo();
    repo.add_commit("feat: released");
    repo.add_tag("v1.0.0");
    repo.add_commit("fix: unreleased fix");
    repo.add_commit("not conventional at all");

    let tags = api.list_version_tags().unwrap();
    let data = api.fetch_unreleased_changes(tags.last()).unwrap().unwrap();
    assert_eq!(data.fixes.len(), 1);
    assert!(data.feats.is_empty());
    assert_eq!(data.fixes[0].commit.message, "fix: unreleased fix");
}
