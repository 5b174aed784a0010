//! Instance annotations and the supervision vectors derived from them.
//!
//! `Instances` holds the working annotations of a dataset next to its
//! ground-truth annotations. Classifier configurations read one of the two
//! (`get_annotations`) and turn it into the supervision vector their
//! learning paradigm expects.

use anyhow::Result;

/// Per-instance annotation columns.
///
/// `labels` carries the binary labels (1 for malicious, 0 for benign) and
/// `families` the finer-grained family names used for multiclass learning.
/// An unset entry means the instance is not annotated.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
    labels: Vec<Option<i32>>,
    families: Vec<Option<String>>,
}

impl Annotations {
    pub fn new(labels: Vec<Option<i32>>, families: Vec<Option<String>>) -> Result<Self> {
        if labels.len() != families.len() {
            anyhow::bail!(
                "Labels ({}) and families ({}) must have equal lengths",
                labels.len(),
                families.len()
            );
        }
        Ok(Annotations { labels, families })
    }

    /// Annotations for a dataset where no instance is labeled yet.
    pub fn unannotated(num_instances: usize) -> Self {
        Annotations {
            labels: vec![None; num_instances],
            families: vec![None; num_instances],
        }
    }

    pub fn num_instances(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[Option<i32>] {
        &self.labels
    }

    pub fn families(&self) -> &[Option<String>] {
        &self.families
    }

    /// The raw supervision column: families when learning on families,
    /// binary labels otherwise.
    pub fn get_supervision(&self, multiclass: bool) -> RawSupervision<'_> {
        if multiclass {
            RawSupervision::Families(&self.families)
        } else {
            RawSupervision::Labels(&self.labels)
        }
    }
}

/// A borrowed annotation column, before any paradigm rule is applied.
#[derive(Debug, Clone, Copy)]
pub enum RawSupervision<'a> {
    Labels(&'a [Option<i32>]),
    Families(&'a [Option<String>]),
}

impl RawSupervision<'_> {
    pub fn len(&self) -> usize {
        match self {
            RawSupervision::Labels(labels) => labels.len(),
            RawSupervision::Families(families) => families.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every entry of the column is set.
    pub fn fully_annotated(&self) -> bool {
        match self {
            RawSupervision::Labels(labels) => labels.iter().all(|label| label.is_some()),
            RawSupervision::Families(families) => {
                families.iter().all(|family| family.is_some())
            }
        }
    }
}

/// A dataset's instances, seen through their annotations.
#[derive(Debug, Clone)]
pub struct Instances {
    annotations: Annotations,
    ground_truth: Annotations,
}

impl Instances {
    pub fn new(annotations: Annotations, ground_truth: Annotations) -> Result<Self> {
        if annotations.num_instances() != ground_truth.num_instances() {
            anyhow::bail!(
                "Working annotations ({}) and ground truth ({}) must cover \
                 the same instances",
                annotations.num_instances(),
                ground_truth.num_instances()
            );
        }
        Ok(Instances {
            annotations,
            ground_truth,
        })
    }

    /// Instances whose only annotations are the ground truth.
    pub fn from_ground_truth(ground_truth: Annotations) -> Self {
        Instances {
            annotations: Annotations::unannotated(ground_truth.num_instances()),
            ground_truth,
        }
    }

    pub fn num_instances(&self) -> usize {
        self.annotations.num_instances()
    }

    pub fn get_annotations(&self, ground_truth: bool) -> &Annotations {
        if ground_truth {
            &self.ground_truth
        } else {
            &self.annotations
        }
    }
}

/// The per-instance label vector fed to a learning algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum Supervision {
    /// Integer-coded labels. Semi-supervised vectors use -1 for instances
    /// that are deliberately unlabeled.
    Integers(Vec<i32>),
    /// Family names, for multiclass supervised learning.
    Families(Vec<String>),
}

impl Supervision {
    pub fn len(&self) -> usize {
        match self {
            Supervision::Integers(values) => values.len(),
            Supervision::Families(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_integers(&self) -> Option<&[i32]> {
        match self {
            Supervision::Integers(values) => Some(values),
            Supervision::Families(_) => None,
        }
    }

    pub fn as_families(&self) -> Option<&[String]> {
        match self {
            Supervision::Families(values) => Some(values),
            Supervision::Integers(_) => None,
        }
    }
}
