//! Per-paradigm supervision-extraction rules.
//!
//! Each learning paradigm accepts different label information:
//! - supervised learning requires every instance annotated and, when
//!   validation is requested, at least two distinct classes;
//! - semi-supervised learning permits unlabeled instances and encodes them
//!   with the sentinel -1;
//! - unsupervised learning only produces a vector when ground truth is
//!   explicitly requested, and never fails on missing labels.

use std::collections::BTreeSet;

use crate::annotations::{RawSupervision, Supervision};
use crate::conf::ClassifierType;
use crate::error::ConfError;

/// Sentinel marking a deliberately unlabeled instance.
pub const UNLABELED: i32 = -1;

/// Apply the extraction rule of `classifier_type` to a raw annotation
/// column.
pub fn extract(
    classifier_type: ClassifierType,
    column: RawSupervision<'_>,
    ground_truth: bool,
    check: bool,
) -> Result<Option<Supervision>, ConfError> {
    match classifier_type {
        ClassifierType::Supervised => supervised(column, check).map(Some),
        ClassifierType::SemiSupervised => Ok(Some(semi_supervised(column))),
        ClassifierType::Unsupervised => Ok(unsupervised(column, ground_truth)),
    }
}

fn supervised(column: RawSupervision<'_>, check: bool) -> Result<Supervision, ConfError> {
    match column {
        RawSupervision::Labels(labels) => {
            let mut values = Vec::with_capacity(labels.len());
            for label in labels {
                values.push(label.ok_or(ConfError::MissingAnnotations)?);
            }
            if check && values.iter().collect::<BTreeSet<_>>().len() < 2 {
                return Err(ConfError::AtLeastTwoClasses);
            }
            Ok(Supervision::Integers(values))
        }
        RawSupervision::Families(families) => {
            let mut values = Vec::with_capacity(families.len());
            for family in families {
                values.push(family.clone().ok_or(ConfError::MissingAnnotations)?);
            }
            if check && values.iter().collect::<BTreeSet<_>>().len() < 2 {
                return Err(ConfError::AtLeastTwoClasses);
            }
            Ok(Supervision::Families(values))
        }
    }
}

// Unset entries are deliberately unlabeled instances, not missing
// annotations: they become the sentinel instead of an error.
fn semi_supervised(column: RawSupervision<'_>) -> Supervision {
    match column {
        RawSupervision::Labels(labels) => Supervision::Integers(
            labels
                .iter()
                .map(|label| label.unwrap_or(UNLABELED))
                .collect(),
        ),
        RawSupervision::Families(families) => encode_families(families),
    }
}

fn unsupervised(column: RawSupervision<'_>, ground_truth: bool) -> Option<Supervision> {
    if !ground_truth {
        return None;
    }
    // Labels are advisory context here; unset entries are coded like
    // unlabeled instances rather than rejected.
    Some(match column {
        RawSupervision::Labels(labels) => Supervision::Integers(
            labels
                .iter()
                .map(|label| label.unwrap_or(UNLABELED))
                .collect(),
        ),
        RawSupervision::Families(families) => encode_families(families),
    })
}

/// Integer-code a family column. Codes follow the sorted order of the
/// distinct family names; unset entries get the sentinel.
fn encode_families(families: &[Option<String>]) -> Supervision {
    let codes: Vec<&String> = families
        .iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    Supervision::Integers(
        families
            .iter()
            .map(|family| match family {
                Some(name) => codes.iter().position(|known| *known == name).unwrap_or(0) as i32,
                None => UNLABELED,
            })
            .collect(),
    )
}
