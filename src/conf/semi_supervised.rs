//! Semi-supervised classifier configurations.
//!
//! Semi-supervised methods learn from partially annotated instances;
//! unlabeled ones are encoded with the sentinel -1 instead of being
//! rejected.

use clap::{ArgMatches, Command};
use serde_json::Value;

use crate::conf::supervised::{multiclass_arg, multiclass_flag};
use crate::conf::{
    require_hyperparams, ClassifierConf, ClassifierType, FeatureImportance, ModelClass,
};
use crate::error::ConfError;
use crate::hyperparam::HyperparamConf;

/// CLI surface of semi-supervised methods. The multiclass switch is only
/// offered when the method supports learning on families.
pub fn gen_parser(command: Command, model_class: ModelClass, multiclass: bool) -> Command {
    let command = if multiclass {
        command.arg(multiclass_arg())
    } else {
        command
    };
    HyperparamConf::gen_parser(command, model_class, false)
}

#[derive(Debug, Clone)]
pub struct LabelPropagationConf {
    multiclass: bool,
    hyperparam_conf: HyperparamConf,
}

impl LabelPropagationConf {
    pub fn new(multiclass: bool, hyperparam_conf: HyperparamConf) -> Self {
        LabelPropagationConf {
            multiclass,
            hyperparam_conf,
        }
    }

    pub fn from_args(
        matches: &ArgMatches,
        hyperparam_conf: Option<HyperparamConf>,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "LabelPropagation")?;
        Ok(Self::new(multiclass_flag(matches), hyperparam_conf))
    }

    pub fn from_json(
        multiclass: bool,
        hyperparam_conf: Option<HyperparamConf>,
        _record: &Value,
    ) -> Result<Self, ConfError> {
        let hyperparam_conf = require_hyperparams(hyperparam_conf, "LabelPropagation")?;
        Ok(Self::new(multiclass, hyperparam_conf))
    }
}

impl ClassifierConf for LabelPropagationConf {
    fn model_class(&self) -> ModelClass {
        ModelClass::LabelPropagation
    }

    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::SemiSupervised
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
        None
    }
}
