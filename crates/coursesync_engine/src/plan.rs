//! Diff planning.
//!
//! Planning is pure: given the desired collection and the last persisted
//! baseline, compute the minimal set of remote mutations without touching
//! the store. Execution lives in the engine.

use crate::config::StalePolicy;
use crate::error::{SyncError, SyncResult};
use coursesync_model::{LessonId, Section, SectionId, ValidationError};
use std::collections::{HashMap, HashSet};

/// A single planned create or update, in desired order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Persist a new section. The carried section holds a provisional id,
    /// or an unknown persisted id under [`StalePolicy::CreateMissing`].
    Create(Section),
    /// Overwrite the stored section carrying the same persisted id.
    Update(Section),
}

/// The minimal set of remote mutations that transforms the baseline
/// collection into the desired one.
///
/// Deletions carry no ordering dependency between each other and are kept
/// separate; creates and updates preserve the desired collection's order,
/// which is observable when the store assigns ids or positions by call
/// order.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    lesson: LessonId,
    /// Baseline sections absent from the desired collection.
    pub deletes: Vec<Section>,
    /// Creates and updates, in desired order.
    pub upserts: Vec<Mutation>,
    /// Number of desired sections identical to their baseline counterpart.
    pub unchanged: usize,
}

impl SyncPlan {
    /// Diffs `desired` against `baseline` for one lesson.
    ///
    /// Both collections are validated first: every section must belong to
    /// `lesson`, ids must be unique per collection, and records must pass
    /// [`Section::validate`]. The baseline must contain persisted sections
    /// only. No store call is made here.
    pub fn build(
        lesson: &LessonId,
        desired: &[Section],
        baseline: &[Section],
        stale_policy: StalePolicy,
    ) -> SyncResult<SyncPlan> {
        validate_collection(lesson, desired)?;
        validate_collection(lesson, baseline)?;

        for section in baseline {
            if let SectionId::Provisional(token) = &section.id {
                return Err(SyncError::ProvisionalBaseline {
                    token: token.clone(),
                });
            }
        }

        let baseline_by_id: HashMap<&SectionId, &Section> =
            baseline.iter().map(|section| (&section.id, section)).collect();
        let desired_ids: HashSet<&SectionId> =
            desired.iter().map(|section| &section.id).collect();

        let deletes: Vec<Section> = baseline
            .iter()
            .filter(|section| !desired_ids.contains(&section.id))
            .cloned()
            .collect();

        let mut upserts = Vec::new();
        let mut unchanged = 0usize;

        for section in desired {
            match &section.id {
                SectionId::Provisional(_) => upserts.push(Mutation::Create(section.clone())),
                SectionId::Persisted(id) => match baseline_by_id.get(&section.id) {
                    Some(existing) => {
                        if section.content_eq(existing) {
                            unchanged += 1;
                        } else {
                            upserts.push(Mutation::Update(section.clone()));
                        }
                    }
                    None => match stale_policy {
                        StalePolicy::Reject => {
                            return Err(SyncError::StaleBaseline { id: id.clone() })
                        }
                        StalePolicy::CreateMissing => {
                            upserts.push(Mutation::Create(section.clone()))
                        }
                    },
                },
            }
        }

        Ok(SyncPlan {
            lesson: lesson.clone(),
            deletes,
            upserts,
            unchanged,
        })
    }

    /// The lesson this plan targets.
    #[must_use]
    pub fn lesson(&self) -> &LessonId {
        &self.lesson
    }

    /// Planned creates, in desired order.
    pub fn creates(&self) -> impl Iterator<Item = &Section> {
        self.upserts.iter().filter_map(|mutation| match mutation {
            Mutation::Create(section) => Some(section),
            Mutation::Update(_) => None,
        })
    }

    /// Planned updates, in desired order.
    pub fn updates(&self) -> impl Iterator<Item = &Section> {
        self.upserts.iter().filter_map(|mutation| match mutation {
            Mutation::Update(section) => Some(section),
            Mutation::Create(_) => None,
        })
    }

    /// Returns true if the plan issues no mutation at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty() && self.upserts.is_empty()
    }

    /// Total number of mutations the plan will issue.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.deletes.len() + self.upserts.len()
    }
}

fn validate_collection(lesson: &LessonId, sections: &[Section]) -> SyncResult<()> {
    let mut seen: HashSet<&SectionId> = HashSet::with_capacity(sections.len());
    for section in sections {
        section.validate()?;
        if section.lesson != *lesson {
            return Err(ValidationError::LessonMismatch {
                id: section.id.as_str().to_string(),
                expected: lesson.to_string(),
                found: section.lesson.to_string(),
            }
            .into());
        }
        if !seen.insert(&section.id) {
            return Err(ValidationError::DuplicateId {
                id: section.id.as_str().to_string(),
            }
            .into());
        }
    }
    Ok(())
}
