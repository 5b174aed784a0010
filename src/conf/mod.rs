//! Classifier configurations and their factory.
//!
//! Every supported learning method is described by a configuration type
//! implementing [`ClassifierConf`]. The trait carries the capability set a
//! method must declare (model class, paradigm, probabilistic-ness, scoring
//! function, feature-importance kind) and derives the shared behavior from
//! it: experiment naming, interpretability, coefficient extraction,
//! supervision extraction, and the exported record form.

pub mod factory;
pub mod semi_supervised;
pub mod supervised;
pub mod supervision;
pub mod unsupervised;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::annotations::{Instances, Supervision};
use crate::error::ConfError;
use crate::hyperparam::HyperparamConf;
use crate::model::{Coefficients, TrainedModel};

/// Suffix appended to experiment names of multiclass configurations.
const MULTICLASS_SUFFIX: &str = "__Multiclass";

/// Learning paradigm of a classifier, determining what label information
/// its training requires or permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierType {
    Unsupervised,
    SemiSupervised,
    Supervised,
}

impl ClassifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierType::Unsupervised => "unsupervised",
            ClassifierType::SemiSupervised => "semisupervised",
            ClassifierType::Supervised => "supervised",
        }
    }
}

impl FromStr for ClassifierType {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unsupervised" => Ok(ClassifierType::Unsupervised),
            "semisupervised" => Ok(ClassifierType::SemiSupervised),
            "supervised" => Ok(ClassifierType::Supervised),
            _ => Err(ConfError::InvalidParadigm(s.to_string())),
        }
    }
}

impl fmt::Display for ClassifierType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the concrete modeling algorithm behind a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelClass {
    LogisticRegression,
    RandomForest,
    GradientBoosting,
    LabelPropagation,
    IsolationForest,
    AlreadyTrained,
}

impl ModelClass {
    pub fn name(&self) -> &'static str {
        match self {
            ModelClass::LogisticRegression => "LogisticRegression",
            ModelClass::RandomForest => "RandomForest",
            ModelClass::GradientBoosting => "GradientBoosting",
            ModelClass::LabelPropagation => "LabelPropagation",
            ModelClass::IsolationForest => "IsolationForest",
            ModelClass::AlreadyTrained => "AlreadyTrained",
        }
    }
}

impl FromStr for ModelClass {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LogisticRegression" => Ok(ModelClass::LogisticRegression),
            "RandomForest" => Ok(ModelClass::RandomForest),
            "GradientBoosting" => Ok(ModelClass::GradientBoosting),
            "LabelPropagation" => Ok(ModelClass::LabelPropagation),
            "IsolationForest" => Ok(ModelClass::IsolationForest),
            "AlreadyTrained" => Ok(ModelClass::AlreadyTrained),
            _ => Err(ConfError::UnknownMethod(s.to_string())),
        }
    }
}

/// How a trained model exposes its influence-per-feature data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureImportance {
    /// A per-feature importance ranking (tree ensembles).
    Score,
    /// A linear weight vector or matrix.
    Weight,
}

impl FeatureImportance {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureImportance::Score => "score",
            FeatureImportance::Weight => "weight",
        }
    }
}

/// Contract shared by all classifier configurations.
///
/// The required methods form the capability set every concrete method must
/// declare; everything else is derived from them.
pub trait ClassifierConf: fmt::Debug {
    fn model_class(&self) -> ModelClass;

    fn classifier_type(&self) -> ClassifierType;

    fn multiclass(&self) -> bool;

    /// The owned hyperparameter search configuration. `AlreadyTrained`
    /// carries none.
    fn hyperparam_conf(&self) -> Option<&HyperparamConf>;

    fn is_probabilist(&self) -> bool;

    /// Name of the decision function used to score instances, when the
    /// model exposes one.
    fn scoring_function(&self) -> Option<&'static str>;

    fn feature_importance(&self) -> Option<FeatureImportance>;

    fn accept_sparse(&self) -> bool {
        false
    }

    fn model_class_name(&self) -> &'static str {
        self.model_class().name()
    }

    /// Stable experiment identifier. Multiclass configurations are suffixed
    /// so they never collide with their binary counterpart.
    fn exp_name(&self) -> String {
        let mut name = self.model_class_name().to_string();
        if self.multiclass() {
            name.push_str(MULTICLASS_SUFFIX);
        }
        name
    }

    fn is_interpretable(&self) -> bool {
        self.feature_importance().is_some()
    }

    fn interpretable_predictions(&self) -> bool {
        matches!(self.feature_importance(), Some(FeatureImportance::Weight))
    }

    /// Extract the influence-per-feature data matching the declared
    /// feature-importance kind from a trained model.
    fn coefs(&self, model: &dyn TrainedModel) -> Option<Coefficients> {
        match self.feature_importance() {
            Some(FeatureImportance::Weight) => model.coef().map(|coef| {
                if self.multiclass() {
                    Coefficients::Matrix(coef)
                } else {
                    Coefficients::Vector(coef.row(0).to_owned())
                }
            }),
            Some(FeatureImportance::Score) => {
                model.feature_importances().map(Coefficients::Vector)
            }
            None => None,
        }
    }

    /// Extract the supervision vector this paradigm feeds to training.
    ///
    /// Fetches the working or ground-truth annotations and applies the rule
    /// selected by the paradigm tag. All label validation happens here.
    fn get_supervision(
        &self,
        instances: &Instances,
        ground_truth: bool,
        check: bool,
    ) -> Result<Option<Supervision>, ConfError> {
        let annotations = instances.get_annotations(ground_truth);
        supervision::extract(
            self.classifier_type(),
            annotations.get_supervision(self.multiclass()),
            ground_truth,
            check,
        )
    }

    /// Leaf-specific keys appended to the exported record.
    fn export_extra(&self, _record: &mut Map<String, Value>) {}

    /// Exported record form, reloadable through the factory.
    fn to_json(&self) -> anyhow::Result<Value> {
        let mut record = Map::new();
        record.insert(
            "__type__".to_string(),
            Value::from(self.model_class_name()),
        );
        let hyperparam_conf = match self.hyperparam_conf() {
            Some(conf) => serde_json::to_value(conf)?,
            None => Value::Null,
        };
        record.insert("hyperparam_conf".to_string(), hyperparam_conf);
        record.insert("multiclass".to_string(), Value::from(self.multiclass()));
        record.insert("probabilist".to_string(), Value::from(self.is_probabilist()));
        record.insert(
            "feature_importance".to_string(),
            match self.feature_importance() {
                Some(kind) => Value::from(kind.as_str()),
                None => Value::Null,
            },
        );
        record.insert(
            "model_class_name".to_string(),
            Value::from(self.model_class_name()),
        );
        self.export_extra(&mut record);
        Ok(Value::Object(record))
    }
}

pub(crate) fn require_hyperparams(
    hyperparam_conf: Option<HyperparamConf>,
    method: &str,
) -> Result<HyperparamConf, ConfError> {
    hyperparam_conf.ok_or_else(|| {
        ConfError::InvalidHyperparam(format!(
            "'{}' requires a hyperparameter configuration",
            method
        ))
    })
}

/// Reject candidate lists containing anything but strictly positive numbers.
pub(crate) fn positive_values(conf: &HyperparamConf, param: &str) -> Result<(), ConfError> {
    if let Some(candidates) = conf.values.get(param) {
        for candidate in candidates {
            let positive = candidate.as_f64().map(|value| value > 0.0).unwrap_or(false);
            if !positive {
                return Err(ConfError::InvalidHyperparam(format!(
                    "'{}' candidates must be positive numbers, got {}",
                    param, candidate
                )));
            }
        }
    }
    Ok(())
}
