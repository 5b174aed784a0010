//! Unsupervised classifier configurations.
//!
//! Unsupervised methods never learn from labels; supervision extraction
//! only yields a vector when ground truth is explicitly requested, and the
//! multiclass switch is not offered.

use clap::{ArgMatches, Command};
use serde_json::Value;

use crate::conf::{
    require_hyperparams, ClassifierConf, ClassifierType, FeatureImportance, ModelClass,
};
use crate::error::ConfError;
use crate::hyperparam::HyperparamConf;

/// CLI surface of unsupervised methods: hyperparameter search flags only.
pub fn gen_parser(command: Command, model_class: ModelClass) -> Command {
    HyperparamConf::gen_parser(command, model_class, false)
}

#[derive(Debug, Clone)]
pub struct IsolationForestConf {
    hyperparam_conf: HyperparamConf,
}

impl IsolationForestConf {
    pub fn new(hyperparam_conf: HyperparamConf) -> Self {
        IsolationForestConf { hyperparam_conf }
    }

    pub fn from_args(
        _matches: &ArgMatches,
        hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "IsolationForest")?;
        Self::check_hyper_args(&hyperparam_conf)?;
        Ok(Self::new(hyperparam_conf))
    }

    pub fn from_json(
        _multiclass: bool,
        hyperparam_conf: Option<HyperparamConf>,
        _record: &Value,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "IsolationForest")?;
        Ok(Self::new(hyperparam_conf))
    }

    fn check_hyper_args(conf: &HyperparamConf) -> Result<(), ConfError> {
        if let Some(candidates) = conf.values.get("contamination") {
            for candidate in candidates {
                let in_range = candidate
                    .as_f64()
                    .map(|value| value > 0.0 && value <= 0.5)
                    .unwrap_or(false);
                if !in_range {
                    return Err(ConfError::InvalidHyperparam(format!(
                        "'contamination' candidates must lie in (0, 0.5], got {}",
                        candidate
                    )));
                }
            }
        }
        Ok(())
    }
}

impl ClassifierConf for IsolationForestConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::IsolationForest
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Unsupervised
    }

    fn multiclass(&self) -> bool {
        false
    }

    fn hyperparam_conf(&self) -> Option<&HyperparamConf> {
        Some(&self.hyperparam_conf)
    }

    fn is_probabilist(&self) -> bool {
        false
    }

    // The downstream scoring pipeline cannot drive sample scoring for
    // unsupervised models yet, so no scoring function is exposed.
    fn scoring_function(&self) -> Option<&'static str> {
        None
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        None
    }
}
