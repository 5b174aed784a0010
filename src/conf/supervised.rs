//! Supervised classifier configurations.
//!
//! Supervised methods learn from fully annotated instances: either the
//! binary labels or, when the multiclass switch is set, the families.

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};

use crate::conf::{
    positive_values, require_hyperparams, ClassifierConf, ClassifierType, FeatureImportance,
    ModelClass,
};
use crate::error::ConfError;
use crate::hyperparam::HyperparamConf;

/// CLI surface shared by supervised methods: the multiclass switch plus the
/// hyperparameter search flags.
pub fn gen_parser(command: Command, model_class: ModelClass) -> Command {
    HyperparamConf::gen_parser(command.arg(multiclass_arg()), model_class, true)
}

pub(crate) fn multiclass_arg() -> Arg {
    Arg::new("multiclass")
        .long("multiclass")
        .action(ArgAction::SetTrue)
        .help("Train on the families instead of the binary labels.")
}

pub(crate) fn multiclass_flag(matches: &ArgMatches) -> bool {
    matches
        .try_get_one::<bool>("multiclass")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct LogisticRegressionConf {
    multiclass: bool,
    hyperparam_conf: HyperparamConf,
}

impl LogisticRegressionConf {
    pub fn new(multiclass: bool, hyperparam_conf: HyperparamConf) -> Self {
        LogisticRegressionConf {
            multiclass,
            hyperparam_conf,
        }
    }

    pub fn from_args(
        matches: &ArgMatches,
        hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "LogisticRegression")?;
        Self::check_hyper_args(&hyperparam_conf)?;
        Ok(Self::new(multiclass_flag(matches), hyperparam_conf))
    }

    pub fn from_json(
        multiclass: bool,
        hyperparam_conf: Option<HyperparamConf>,
        _record: &Value,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "LogisticRegression")?;
        Ok(Self::new(multiclass, hyperparam_conf))
    }

    fn check_hyper_args(conf: &HyperparamConf) -> Result<(), ConfError> {
        positive_values(conf, "c")?;
        if let Some(penalties) = conf.values.get("penalty") {
            for penalty in penalties {
                match penalty.as_str() {
                    Some("l1") | Some("l2") => {}
                    _ => {
                        return Err(ConfError::InvalidHyperparam(format!(
                            "unsupported penalty {}",
                            penalty
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

impl ClassifierConf for LogisticRegressionConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::LogisticRegression
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Supervised
    }

    fn multiclass(&self) -> bool {
        self.multiclass
    }

    fn hyperparam_conf(&self) -> Option<&HyperparamConf> {
        Some(&self.hyperparam_conf)
    }

    fn is_probabilist(&self) -> bool {
        true
    }

    fn scoring_function(&self) -> Option<&'static str> {
        Some("decision_function")
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        Some(FeatureImportance::Weight)
    }

    fn accept_sparse(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RandomForestConf {
    multiclass: bool,
    hyperparam_conf: HyperparamConf,
}

impl RandomForestConf {
    pub fn new(multiclass: bool, hyperparam_conf: HyperparamConf) -> Self {
        RandomForestConf {
            multiclass,
            hyperparam_conf,
        }
    }

    pub fn from_args(
        matches: &ArgMatches,
        hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "RandomForest")?;
        Self::check_hyper_args(&hyperparam_conf)?;
        Ok(Self::new(multiclass_flag(matches), hyperparam_conf))
    }

    pub fn from_json(
        multiclass: bool,
        hyperparam_conf: Option<HyperparamConf>,
        _record: &Value,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "RandomForest")?;
        Ok(Self::new(multiclass, hyperparam_conf))
    }

    fn check_hyper_args(conf: &HyperparamConf) -> Result<(), ConfError> {
        positive_values(conf, "n_estimators")?;
        positive_values(conf, "max_depth")
    }
}

impl ClassifierConf for RandomForestConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::RandomForest
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Supervised
    }

    fn multiclass(&self) -> bool {
        self.multiclass
    }

    fn hyperparam_conf(&self) -> Option<&HyperparamConf> {
        Some(&self.hyperparam_conf)
    }

    fn is_probabilist(&self) -> bool {
        true
    }

    fn scoring_function(&self) -> Option<&'static str> {
        Some("predict_proba")
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        Some(FeatureImportance::Score)
    }
}

#[derive(Debug, Clone)]
pub struct GradientBoostingConf {
    multiclass: bool,
    hyperparam_conf: HyperparamConf,
}

impl GradientBoostingConf {
    pub fn new(multiclass: bool, hyperparam_conf: HyperparamConf) -> Self {
        GradientBoostingConf {
            multiclass,
            hyperparam_conf,
        }
    }

    pub fn from_args(
        matches: &ArgMatches,
        hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "GradientBoosting")?;
        Self::check_hyper_args(&hyperparam_conf)?;
        Ok(Self::new(multiclass_flag(matches), hyperparam_conf))
    }

    pub fn from_json(
        multiclass: bool,
        hyperparam_conf: Option<HyperparamConf>,
        _record: &Value,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "GradientBoosting")?;
        Ok(Self::new(multiclass, hyperparam_conf))
    }

    fn check_hyper_args(conf: &HyperparamConf) -> Result<(), ConfError> {
        positive_values(conf, "n_estimators")?;
        positive_values(conf, "learning_rate")
    }
}

impl ClassifierConf for GradientBoostingConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::GradientBoosting
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Supervised
    }

    fn multiclass(&self) -> bool {
        self.multiclass
    }

    fn hyperparam_conf(&self) -> Option<&HyperparamConf> {
        Some(&self.hyperparam_conf)
    }

    fn is_probabilist(&self) -> bool {
        true
    }

    fn scoring_function(&self) -> Option<&'static str> {
        Some("decision_function")
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        Some(FeatureImportance::Score)
    }
}

/// Pass-through configuration for a model trained outside the toolkit.
/// Carries no hyperparameter search, only the path of the serialized model.
#[derive(Debug, Clone)]
pub struct AlreadyTrainedConf {
    multiclass: bool,
    model_path: String,
}

impl AlreadyTrainedConf {
    pub fn new(multiclass: bool, model_path: String) -> Self {
        AlreadyTrainedConf {
            multiclass,
            model_path,
        }
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn gen_parser(command: Command) -> Command {
        command.arg(multiclass_arg()).arg(
            Arg::new("model_path")
                .long("model-path")
                .required(true)
                .help("Path of the serialized trained model."),
        )
    }

    pub fn from_args(
        matches: &ArgMatches,
        _hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let model_path = matches
            .try_get_one::<String>("model_path")
            .ok()
            .flatten()
            .cloned()
            .ok_or_else(|| {
                ConfError::MalformedRecord("'AlreadyTrained' requires --model-path".to_string())
            })?;
        Ok(Self::new(multiclass_flag(matches), model_path))
    }

    pub fn from_json(
        multiclass: bool,
        _hyperparam_conf: Option<HyperparamConf>,
        record: &Value,
    ) -> Result<Self, ConfError> {
        let model_path = record
            .get("model_path")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfError::MalformedRecord("missing 'model_path'".to_string()))?;
        Ok(Self::new(multiclass, model_path.to_string()))
    }
}

impl ClassifierConf for AlreadyTrainedConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::AlreadyTrained
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Supervised
    }

    fn multiclass(&self) -> bool {
        self.multiclass
    }

    fn hyperparam_conf(&self) -> Option<&HyperparamConf> {
        None
    }

    fn is_probabilist(&self) -> bool {
        false
    }

    fn scoring_function(&self) -> Option<&'static str> {
        None
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        None
    }

    fn export_extra(&self, record: &mut Map<String, Value>) {
        record.insert("model_path".to_string(), Value::from(self.model_path.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_hyper(model_class: ModelClass) -> HyperparamConf {
        HyperparamConf::get_default(model_class, true, 4, -1, false)
    }

    #[test]
    fn from_args_reads_the_multiclass_switch() {
        let command = gen_parser(Command::new("test"), ModelClass::LogisticRegression);
        let matches = command.try_get_matches_from(["test", "--multiclass"]).unwrap();
        let hyper = HyperparamConf::from_args(
            &matches,
            ModelClass::LogisticRegression,
            true,
        )
        .unwrap();
        let conf = LogisticRegressionConf::from_args(&matches, Some(hyper)).unwrap();
        assert!(conf.multiclass());
        assert_eq!(conf.exp_name(), "LogisticRegression__Multiclass");
    }

    #[test]
    fn logistic_regression_rejects_unknown_penalties() {
        let mut hyper = default_hyper(ModelClass::LogisticRegression);
        hyper
            .values
            .insert("penalty".to_string(), vec![Value::from("elasticnet")]);
        let command = gen_parser(Command::new("test"), ModelClass::LogisticRegression);
        let matches = command.try_get_matches_from(["test"]).unwrap();
        let err = LogisticRegressionConf::from_args(&matches, Some(hyper)).unwrap_err();
        assert!(matches!(err, ConfError::InvalidHyperparam(_)));
    }

    #[test]
    fn random_forest_rejects_non_positive_estimator_counts() {
        let mut hyper = default_hyper(ModelClass::RandomForest);
        hyper
            .values
            .insert("n_estimators".to_string(), vec![Value::from(0)]);
        let command = gen_parser(Command::new("test"), ModelClass::RandomForest);
        let matches = command.try_get_matches_from(["test"]).unwrap();
        let err = RandomForestConf::from_args(&matches, Some(hyper)).unwrap_err();
        assert!(matches!(err, ConfError::InvalidHyperparam(_)));
    }

    #[test]
    fn already_trained_exports_its_model_path() {
        let conf = AlreadyTrainedConf::new(false, "/models/exported.bin".to_string());
        let record = conf.to_json().unwrap();
        assert_eq!(record["model_path"], "/models/exported.bin");
        assert_eq!(record["hyperparam_conf"], Value::Null);
    }
}
