use chrono::{DateTime, NaiveDateTime};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};

use crate::error::{BumpifyError, Result};
use crate::git::{Commit, Tag};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit, or `None` for a repository without commits
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, rev: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| BumpifyError::repository(format!("Cannot resolve '{}': {}", rev, e)))?;
        Ok(object.peel_to_commit()?.id())
    }

    fn read_commit(&self, oid: Oid) -> Result<Commit> {
        let commit = self.repo.find_commit(oid)?;
        let author = commit.author();
        Ok(Commit {
            rev: oid.to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
            author_email: author.email().unwrap_or_default().to_string(),
            author_date: to_utc(author.when())?,
            message: commit.message().unwrap_or_default().to_string(),
        })
    }
}

fn to_utc(time: git2::Time) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(time.seconds(), 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| BumpifyError::repository(format!("Invalid timestamp: {}", time.seconds())))
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(reference) if reference.is_branch() => reference
                .shorthand()
                .map(|s| s.to_string())
                .ok_or_else(|| BumpifyError::repository("Branch name is not valid UTF-8")),
            Ok(_) => Err(BumpifyError::repository("HEAD is detached")),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(|s| s.to_string())
                    .ok_or_else(|| BumpifyError::repository("Cannot determine current branch"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list_merged_tags(&self) -> Result<Vec<Tag>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut tags = Vec::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(_) => {
                    log::debug!("Skipping tag not pointing at a commit: {}", name);
                    continue;
                }
            };
            let oid = commit.id();
            if oid != head && !self.repo.graph_descendant_of(head, oid)? {
                log::debug!("Skipping tag not merged into HEAD: {}", name);
                continue;
            }
            let created = match reference.peel_to_tag() {
                Ok(annotated) => match annotated.tagger() {
                    Some(tagger) => to_utc(tagger.when())?,
                    None => to_utc(commit.time())?,
                },
                Err(_) => to_utc(commit.time())?,
            };
            tags.push(Tag {
                name: name.to_string(),
                rev: oid.to_string(),
                created,
            });
        }
        Ok(tags)
    }

    fn list_commits(&self, start_rev: Option<&str>, end_rev: Option<&str>) -> Result<Vec<Commit>> {
        let end = match end_rev {
            Some(rev) => self.resolve(rev)?,
            None => match self.head_oid()? {
                Some(oid) => oid,
                None => return Ok(Vec::new()),
            },
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(end)?;
        if let Some(rev) = start_rev {
            revwalk.hide(self.resolve(rev)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            commits.push(self.read_commit(oid?)?);
        }
        log::debug!(
            "Found {} commit(s) in range {}..{}",
            commits.len(),
            start_rev.unwrap_or("(root)"),
            end
        );
        Ok(commits)
    }

    fn add(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            log::debug!("Staging {}", path.display());
            index.add_path(path)?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<String> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = match self.head_oid()? {
            Some(oid) => Some(self.repo.find_commit(oid)?),
            None => None,
        };
        if !allow_empty && parent.as_ref().is_some_and(|p| p.tree_id() == tree.id()) {
            return Err(BumpifyError::repository("Nothing to commit"));
        }

        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        log::debug!("Created commit {}", oid);
        Ok(oid.to_string())
    }

    fn tag(&self, rev: &str, name: &str) -> Result<()> {
        let object = self.repo.find_object(self.resolve(rev)?, None)?;
        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| BumpifyError::repository(format!("Cannot create tag '{}': {}", name, e)))?;
        log::debug!("Created tag {} at {}", name, rev);
        Ok(())
    }

    fn head_rev(&self) -> Result<Option<String>> {
        Ok(self.head_oid()?.map(|oid| oid.to_string()))
    }
}
