//! Tag Merge
//!
//! Folds source tags into a destination tag. Per-source problems (merging a
//! tag into itself, naming a tag that does not exist) are collected as
//! warnings and the remaining sources are still merged; storage failures
//! abort the whole merge.

use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{DomainError, DomainResult, Tag};
use crate::repository::{
    FileTagRepository, ImplicationStore, NamedRepository, Repository, TagRepository,
};

/// A source tag that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum MergeWarning {
    #[error("cannot merge tag '{0}' into itself")]
    IntoItself(String),

    #[error("no such tag '{0}'")]
    NoSuchTag(String),
}

/// What a merge did
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub destination: Tag,
    /// Source tags merged and deleted, in the order given
    pub merged: Vec<Tag>,
    pub warnings: Vec<MergeWarning>,
}

impl MergeReport {
    fn new(destination: Tag) -> Self {
        Self {
            destination,
            merged: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// True when some sources were skipped. The merges that could be done
    /// were still applied; callers usually report this as a non-zero exit.
    pub fn completed_with_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub(super) fn merge_within(
    conn: &Connection,
    source_names: &[&str],
    dest_name: &str,
) -> DomainResult<MergeReport> {
    let tags = TagRepository::new(conn);
    let file_tags = FileTagRepository::new(conn);
    let implications = ImplicationStore::new(conn);

    let dest = tags
        .find_by_name(dest_name)?
        .ok_or_else(|| DomainError::NotFound(format!("no such tag '{}'", dest_name)))?;

    let mut report = MergeReport::new(dest.clone());

    for &source_name in source_names {
        if source_name == dest_name {
            skip(&mut report, MergeWarning::IntoItself(source_name.to_string()));
            continue;
        }

        let Some(source) = tags.find_by_name(source_name)? else {
            skip(&mut report, MergeWarning::NoSuchTag(source_name.to_string()));
            continue;
        };

        info!("finding files tagged '{}'", source.name);
        let matching = file_tags.by_tag(source.id)?;

        info!("applying tag '{}' to {} file-tag(s)", dest.name, matching.len());
        for file_tag in &matching {
            file_tags.add(file_tag.file_id, dest.id, file_tag.value_id)?;
        }

        implications.update_for_tag(source.id, dest.id)?;

        info!("deleting tag '{}'", source.name);
        tags.delete(source.id)?;

        report.merged.push(source);
    }

    Ok(report)
}

fn skip(report: &mut MergeReport, warning: MergeWarning) {
    warn!("{}", warning);
    report.warnings.push(warning);
}
