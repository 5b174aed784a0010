//! Hyperparameter sub-configuration attached to every classifier
//! configuration.
//!
//! A `HyperparamConf` describes how the optimal hyperparameters of a model
//! are searched for: the cross-validation fold count, the parallelism
//! degree, the scoring objective, and the candidate values for each tunable
//! hyperparameter of the model class.

use std::collections::BTreeMap;

use clap::{Arg, ArgMatches, Command};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conf::ModelClass;
use crate::error::ConfError;

const DEFAULT_NUM_FOLDS: usize = 4;
const DEFAULT_N_JOBS: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparamConf {
    /// Number of cross-validation folds used by the search.
    pub num_folds: usize,
    /// Parallelism degree, -1 meaning all available cores.
    pub n_jobs: i32,
    /// Scoring objective of the search. Unset for unsupervised searches.
    pub objective: Option<String>,
    /// Candidate values per tunable hyperparameter of the model class.
    pub values: BTreeMap<String, Vec<Value>>,
}

/// Tunable hyperparameters of each model class, with their default
/// candidate values as comma-separated tokens.
fn tunable_params(model_class: ModelClass) -> &'static [(&'static str, &'static str)] {
    match model_class {
        ModelClass::LogisticRegression => {
            &[("c", "0.01,0.1,1.0,10.0,100.0"), ("penalty", "l1,l2")]
        }
        ModelClass::RandomForest => &[("n_estimators", "10,50,100"), ("max_depth", "2,4,8")],
        ModelClass::GradientBoosting => {
            &[("n_estimators", "50,100"), ("learning_rate", "0.01,0.05,0.1")]
        }
        ModelClass::LabelPropagation => &[("n_neighbors", "3,5,7"), ("gamma", "0.1,1.0,10.0")],
        ModelClass::IsolationForest => {
            &[("n_estimators", "100"), ("contamination", "0.05,0.1,0.2")]
        }
        ModelClass::AlreadyTrained => &[],
    }
}

fn objective(supervised: bool, multiclass: bool) -> Option<String> {
    if !supervised {
        return None;
    }
    if multiclass {
        Some("f1_macro".to_string())
    } else {
        Some("roc_auc".to_string())
    }
}

/// Parse one candidate-value token: integer, then float, then plain string.
fn parse_token(token: &str) -> Value {
    if let Ok(int_value) = token.parse::<i64>() {
        return Value::from(int_value);
    }
    if let Ok(float_value) = token.parse::<f64>() {
        return Value::from(float_value);
    }
    Value::from(token)
}

fn parse_token_list(tokens: &str) -> Vec<Value> {
    tokens
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

impl HyperparamConf {
    /// Default search configuration for a model class.
    pub fn get_default(
        model_class: ModelClass,
        supervised: bool,
        num_folds: usize,
        n_jobs: i32,
        multiclass: bool,
    ) -> Self {
        let values = tunable_params(model_class)
            .iter()
            .map(|(param, defaults)| (param.to_string(), parse_token_list(defaults)))
            .collect();
        HyperparamConf {
            num_folds,
            n_jobs,
            objective: objective(supervised, multiclass),
            values,
        }
    }

    /// Add the hyperparameter search flags for `model_class` to a command.
    pub fn gen_parser(command: Command, model_class: ModelClass, _supervised: bool) -> Command {
        let mut command = command
            .arg(
                Arg::new("num_folds")
                    .long("num-folds")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("4")
                    .help("Number of cross-validation folds for the hyperparameter search."),
            )
            .arg(
                Arg::new("n_jobs")
                    .long("n-jobs")
                    .value_parser(clap::value_parser!(i32))
                    .allow_hyphen_values(true)
                    .default_value("-1")
                    .help("Number of parallel jobs, -1 for all available cores."),
            );
        for (param, defaults) in tunable_params(model_class) {
            command = command.arg(
                Arg::new(*param)
                    .long(*param)
                    .allow_hyphen_values(true)
                    .default_value(*defaults)
                    .help("Comma-separated candidate values for the hyperparameter search."),
            );
        }
        command
    }

    /// Build the search configuration from parsed command-line arguments.
    pub fn from_args(
        matches: &ArgMatches,
        model_class: ModelClass,
        supervised: bool,
    ) -> Result<Self, ConfError> {
        let num_folds = matches
            .get_one::<usize>("num_folds")
            .copied()
            .unwrap_or(DEFAULT_NUM_FOLDS);
        let n_jobs = matches
            .get_one::<i32>("n_jobs")
            .copied()
            .unwrap_or(DEFAULT_N_JOBS);
        // The multiclass flag only exists on parsers whose paradigm offers it.
        let multiclass = matches
            .try_get_one::<bool>("multiclass")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false);

        let mut values = BTreeMap::new();
        for (param, defaults) in tunable_params(model_class) {
            let tokens = matches
                .get_one::<String>(param)
                .map(String::as_str)
                .unwrap_or(defaults);
            let candidates = parse_token_list(tokens);
            if candidates.is_empty() {
                return Err(ConfError::InvalidHyperparam(format!(
                    "no candidate values given for '{}'",
                    param
                )));
            }
            values.insert(param.to_string(), candidates);
        }

        Ok(HyperparamConf {
            num_folds,
            n_jobs,
            objective: objective(supervised, multiclass),
            values,
        })
    }

    /// Rebuild the search configuration from its exported record.
    pub fn from_json(record: &Value, model_class: ModelClass) -> Result<Self, ConfError> {
        let conf: HyperparamConf = serde_json::from_value(record.clone()).map_err(|err| {
            ConfError::InvalidHyperparam(format!("malformed hyperparameter record: {}", err))
        })?;
        let known: Vec<&str> = tunable_params(model_class)
            .iter()
            .map(|(param, _)| *param)
            .collect();
        for param in conf.values.keys() {
            if !known.contains(&param.as_str()) {
                log::warn!(
                    "Hyperparameter '{}' is not tunable for {}",
                    param,
                    model_class.name()
                );
            }
        }
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_conf_seeds_the_model_grid() {
        let conf =
            HyperparamConf::get_default(ModelClass::LogisticRegression, true, 4, -1, false);
        assert_eq!(conf.num_folds, 4);
        assert_eq!(conf.n_jobs, -1);
        assert_eq!(conf.objective.as_deref(), Some("roc_auc"));
        assert_eq!(conf.values["penalty"], vec![Value::from("l1"), Value::from("l2")]);
        assert_eq!(conf.values["c"].len(), 5);
    }

    #[test]
    fn objective_follows_paradigm_and_multiclass() {
        let multi = HyperparamConf::get_default(ModelClass::RandomForest, true, 4, -1, true);
        assert_eq!(multi.objective.as_deref(), Some("f1_macro"));
        let unsup =
            HyperparamConf::get_default(ModelClass::IsolationForest, false, 4, -1, false);
        assert_eq!(unsup.objective, None);
    }

    #[test]
    fn already_trained_has_no_tunable_grid() {
        let conf = HyperparamConf::get_default(ModelClass::AlreadyTrained, true, 4, -1, false);
        assert!(conf.values.is_empty());
    }

    #[test]
    fn from_args_reads_overridden_candidates() {
        let command = HyperparamConf::gen_parser(
            Command::new("test"),
            ModelClass::LogisticRegression,
            true,
        );
        let matches = command
            .try_get_matches_from(["test", "--num-folds", "10", "--c", "0.5,5.0"])
            .unwrap();
        let conf =
            HyperparamConf::from_args(&matches, ModelClass::LogisticRegression, true).unwrap();
        assert_eq!(conf.num_folds, 10);
        assert_eq!(conf.values["c"], vec![Value::from(0.5), Value::from(5.0)]);
        // untouched flags keep their seeded defaults
        assert_eq!(conf.values["penalty"].len(), 2);
    }

    #[test]
    fn token_parsing_prefers_integers_then_floats() {
        assert_eq!(parse_token("3"), Value::from(3i64));
        assert_eq!(parse_token("0.5"), Value::from(0.5));
        assert_eq!(parse_token("l2"), Value::from("l2"));
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let conf = HyperparamConf::get_default(ModelClass::GradientBoosting, true, 6, 2, false);
        let record = serde_json::to_value(&conf).unwrap();
        let rebuilt = HyperparamConf::from_json(&record, ModelClass::GradientBoosting).unwrap();
        assert_eq!(conf, rebuilt);
    }
}
