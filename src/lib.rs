//! vigil-classifiers: classifier configuration layer for the Vigil
//! security-analytics toolkit.
//!
//! This crate describes and validates the machine-learning classifiers the
//! toolkit can train: a factory maps method names to configuration types,
//! each configuration owns its hyperparameter search settings, and the
//! three learning paradigms (supervised, semi-supervised, unsupervised)
//! enforce their own rules when extracting supervision vectors from
//! annotated instances.
//!
//! Model fitting itself lives elsewhere; the only contract with trained
//! models is the coefficient-extraction seam in [`model`].
pub mod annotations;
pub mod conf;
pub mod error;
pub mod hyperparam;
pub mod model;
