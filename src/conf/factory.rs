//! Method registry and configuration factory.
//!
//! The factory owns the mapping from method name to configuration type.
//! Each registered method carries its paradigm tag, so paradigm queries are
//! O(1) lookups instead of type inspection. The registry is meant to be
//! populated once at startup (`with_default_methods`, plus any `register`
//! calls) and read-only afterwards.

use clap::{ArgMatches, Command};
use serde_json::Value;

use crate::conf::semi_supervised::{self, LabelPropagationConf};
use crate::conf::supervised::{
    self, AlreadyTrainedConf, GradientBoostingConf, LogisticRegressionConf, RandomForestConf,
};
use crate::conf::unsupervised::{self, IsolationForestConf};
use crate::conf::{ClassifierConf, ClassifierType, ModelClass};
use crate::error::ConfError;
use crate::hyperparam::HyperparamConf;

pub type FromArgsFn =
    fn(&ArgMatches, Option<HyperparamConf>) -> Result<Box<dyn ClassifierConf>, ConfError>;
pub type FromJsonFn =
    fn(bool, Option<HyperparamConf>, &Value) -> Result<Box<dyn ClassifierConf>, ConfError>;
pub type DefaultFn = fn(bool, Option<HyperparamConf>) -> Box<dyn ClassifierConf>;
pub type GenParserFn = fn(Command) -> Command;

/// Registration record of one classifier method.
pub struct MethodEntry {
    pub name: &'static str,
    /// Paradigm tag, attached when the method is registered.
    pub classifier_type: ClassifierType,
    pub model_class: ModelClass,
    /// False only for pass-through methods carrying no hyperparameters.
    pub has_hyperparams: bool,
    pub from_args: FromArgsFn,
    pub from_json: FromJsonFn,
    pub default_conf: DefaultFn,
    pub gen_parser: GenParserFn,
}

pub struct ClassifierConfFactory {
    methods: Vec<MethodEntry>,
}

impl ClassifierConfFactory {
    /// An empty registry. Most callers want [`with_default_methods`].
    ///
    /// [`with_default_methods`]: ClassifierConfFactory::with_default_methods
    pub fn new() -> Self {
        ClassifierConfFactory {
            methods: Vec::new(),
        }
    }

    /// A registry seeded with every built-in classifier method.
    pub fn with_default_methods() -> Self {
        let mut factory = Self::new();
        factory.register(MethodEntry {
            name: "LogisticRegression",
            classifier_type: ClassifierType::Supervised,
            model_class: ModelClass::LogisticRegression,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                LogisticRegressionConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                LogisticRegressionConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |multiclass, hyper| {
                Box::new(LogisticRegressionConf::new(
                    multiclass,
                    hyper.unwrap_or_else(|| {
                        HyperparamConf::get_default(
                            ModelClass::LogisticRegression,
                            true,
                            4,
                            -1,
                            multiclass,
                        )
                    }),
                ))
            },
            gen_parser: |command| {
                supervised::gen_parser(command, ModelClass::LogisticRegression)
            },
        });
        factory.register(MethodEntry {
            name: "RandomForest",
            classifier_type: ClassifierType::Supervised,
            model_class: ModelClass::RandomForest,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                RandomForestConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                RandomForestConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |multiclass, hyper| {
                Box::new(RandomForestConf::new(
                    multiclass,
                    hyper.unwrap_or_else(|| {
                        HyperparamConf::get_default(
                            ModelClass::RandomForest,
                            true,
                            4,
                            -1,
                            multiclass,
                        )
                    }),
                ))
            },
            gen_parser: |command| supervised::gen_parser(command, ModelClass::RandomForest),
        });
        factory.register(MethodEntry {
            name: "GradientBoosting",
            classifier_type: ClassifierType::Supervised,
            model_class: ModelClass::GradientBoosting,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                GradientBoostingConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                GradientBoostingConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |multiclass, hyper| {
                Box::new(GradientBoostingConf::new(
                    multiclass,
                    hyper.unwrap_or_else(|| {
                        HyperparamConf::get_default(
                            ModelClass::GradientBoosting,
                            true,
                            4,
                            -1,
                            multiclass,
                        )
                    }),
                ))
            },
            gen_parser: |command| supervised::gen_parser(command, ModelClass::GradientBoosting),
        });
        factory.register(MethodEntry {
            name: "AlreadyTrained",
            classifier_type: ClassifierType::Supervised,
            model_class: ModelClass::AlreadyTrained,
            has_hyperparams: false,
            from_args: |matches, hyper| {
                AlreadyTrainedConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                AlreadyTrainedConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |multiclass, _hyper| {
                Box::new(AlreadyTrainedConf::new(multiclass, String::new()))
            },
            gen_parser: AlreadyTrainedConf::gen_parser,
        });
        factory.register(MethodEntry {
            name: "LabelPropagation",
            classifier_type: ClassifierType::SemiSupervised,
            model_class: ModelClass::LabelPropagation,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                LabelPropagationConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                LabelPropagationConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |multiclass, hyper| {
                Box::new(LabelPropagationConf::new(
                    multiclass,
                    hyper.unwrap_or_else(|| {
                        HyperparamConf::get_default(
                            ModelClass::LabelPropagation,
                            false,
                            4,
                            -1,
                            multiclass,
                        )
                    }),
                ))
            },
            gen_parser: |command| {
                semi_supervised::gen_parser(command, ModelClass::LabelPropagation, true)
            },
        });
        factory.register(MethodEntry {
            name: "IsolationForest",
            classifier_type: ClassifierType::Unsupervised,
            model_class: ModelClass::IsolationForest,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                IsolationForestConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                IsolationForestConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |_multiclass, hyper| {
                Box::new(IsolationForestConf::new(hyper.unwrap_or_else(|| {
                    HyperparamConf::get_default(ModelClass::IsolationForest, false, 4, -1, false)
                })))
            },
            gen_parser: |command| unsupervised::gen_parser(command, ModelClass::IsolationForest),
        });
        factory
    }

    /// Register a method, replacing any existing entry under the same name.
    pub fn register(&mut self, entry: MethodEntry) {
        if let Some(existing) = self
            .methods
            .iter_mut()
            .find(|existing| existing.name == entry.name)
        {
            log::warn!("Replacing registered classifier method '{}'", entry.name);
            *existing = entry;
        } else {
            self.methods.push(entry);
        }
    }

    fn get(&self, method: &str) -> Result<&MethodEntry, ConfError> {
        self.methods
            .iter()
            .find(|entry| entry.name == method)
            .ok_or_else(|| ConfError::UnknownMethod(method.to_string()))
    }

    /// Build a configuration from parsed command-line arguments.
    ///
    /// Pass-through methods carry no hyperparameters; every other method
    /// gets a `HyperparamConf` built from the same arguments, searched with
    /// a supervised objective exactly when the method's paradigm is
    /// supervised.
    pub fn from_args(
        &self,
        method: &str,
        matches: &ArgMatches,
    ) -> Result<Box<dyn ClassifierConf>, ConfError> {
        let entry = self.get(method)?;
        let hyperparam_conf = if entry.has_hyperparams {
            let supervised = entry.classifier_type == ClassifierType::Supervised;
            Some(HyperparamConf::from_args(
                matches,
                entry.model_class,
                supervised,
            )?)
        } else {
            None
        };
        (entry.from_args)(matches, hyperparam_conf)
    }

    /// Rebuild a configuration from its exported record.
    pub fn from_json(&self, record: &Value) -> Result<Box<dyn ClassifierConf>, ConfError> {
        let method = record
            .get("__type__")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfError::MalformedRecord("missing '__type__'".to_string()))?;
        let entry = self.get(method)?;
        let multiclass = record
            .get("multiclass")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let hyperparam_conf = if entry.has_hyperparams {
            let sub_record = record.get("hyperparam_conf").ok_or_else(|| {
                ConfError::MalformedRecord("missing 'hyperparam_conf'".to_string())
            })?;
            Some(HyperparamConf::from_json(sub_record, entry.model_class)?)
        } else {
            None
        };
        (entry.from_json)(multiclass, hyperparam_conf, record)
    }

    /// Registered method names, optionally restricted to one paradigm.
    pub fn methods(&self, classifier_type: Option<ClassifierType>) -> Vec<&'static str> {
        self.methods
            .iter()
            .filter(|entry| classifier_type.map_or(true, |tag| entry.classifier_type == tag))
            .map(|entry| entry.name)
            .collect()
    }

    /// Paradigm tag of a registered method.
    pub fn classifier_type(&self, method: &str) -> Result<ClassifierType, ConfError> {
        Ok(self.get(method)?.classifier_type)
    }

    /// Build a default configuration directly, without argument parsing.
    pub fn get_default(
        &self,
        model_class: &str,
        num_folds: usize,
        n_jobs: i32,
        multiclass: bool,
    ) -> Result<Box<dyn ClassifierConf>, ConfError> {
        let entry = self.get(model_class)?;
        let supervised = entry.classifier_type == ClassifierType::Supervised;
        let hyperparam_conf = entry.has_hyperparams.then(|| {
            HyperparamConf::get_default(
                entry.model_class,
                supervised,
                num_folds,
                n_jobs,
                multiclass,
            )
        });
        Ok((entry.default_conf)(multiclass, hyperparam_conf))
    }

    /// Attach a method's CLI surface to a command.
    pub fn gen_parser(&self, method: &str, command: Command) -> Result<Command, ConfError> {
        Ok((self.get(method)?.gen_parser)(command))
    }
}

impl Default for ClassifierConfFactory {
    fn default() -> Self {
        Self::with_default_methods()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_methods_are_lookup_errors() {
        let factory = ClassifierConfFactory::with_default_methods();
        let err = factory.classifier_type("Perceptron").unwrap_err();
        assert_eq!(err, ConfError::UnknownMethod("Perceptron".to_string()));
    }

    #[test]
    fn paradigm_subsets_partition_the_method_set() {
        let factory = ClassifierConfFactory::with_default_methods();
        let all = factory.methods(None);
        let supervised = factory.methods(Some(ClassifierType::Supervised));
        let semi = factory.methods(Some(ClassifierType::SemiSupervised));
        let unsupervised = factory.methods(Some(ClassifierType::Unsupervised));

        assert_eq!(all.len(), supervised.len() + semi.len() + unsupervised.len());
        for method in &all {
            let memberships = [&supervised, &semi, &unsupervised]
                .iter()
                .filter(|subset| subset.contains(method))
                .count();
            assert_eq!(memberships, 1, "{} must belong to exactly one paradigm", method);
        }
    }

    #[test]
    fn registration_replaces_same_name_entries() {
        let mut factory = ClassifierConfFactory::with_default_methods();
        let before = factory.methods(None).len();
        factory.register(MethodEntry {
            name: "IsolationForest",
            classifier_type: ClassifierType::Unsupervised,
            model_class: ModelClass::IsolationForest,
            has_hyperparams: true,
            from_args: |matches, hyper| {
                IsolationForestConf::from_args(matches, hyper)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            from_json: |multiclass, hyper, record| {
                IsolationForestConf::from_json(multiclass, hyper, record)
                    .map(|conf| Box::new(conf) as Box<dyn ClassifierConf>)
            },
            default_conf: |_multiclass, hyper| {
                Box::new(IsolationForestConf::new(hyper.unwrap_or_else(|| {
                    HyperparamConf::get_default(ModelClass::IsolationForest, false, 4, -1, false)
                })))
            },
            gen_parser: |command| unsupervised::gen_parser(command, ModelClass::IsolationForest),
        });
        assert_eq!(factory.methods(None).len(), before);
    }

    #[test]
    fn get_default_builds_without_argument_parsing() {
        let factory = ClassifierConfFactory::with_default_methods();
        let conf = factory.get_default("RandomForest", 6, 2, true).unwrap();
        assert_eq!(conf.model_class_name(), "RandomForest");
        assert!(conf.multiclass());
        let hyper = conf.hyperparam_conf().unwrap();
        assert_eq!(hyper.num_folds, 6);
        assert_eq!(hyper.n_jobs, 2);
        assert_eq!(hyper.objective.as_deref(), Some("f1_macro"));
    }

    #[test]
    fn already_trained_skips_hyperparameter_construction() {
        let factory = ClassifierConfFactory::with_default_methods();
        let command = factory
            .gen_parser("AlreadyTrained", Command::new("test"))
            .unwrap();
        let matches = command
            .try_get_matches_from(["test", "--model-path", "/models/m.bin"])
            .unwrap();
        let conf = factory.from_args("AlreadyTrained", &matches).unwrap();
        assert!(conf.hyperparam_conf().is_none());
        assert_eq!(conf.model_class_name(), "AlreadyTrained");
    }
}
