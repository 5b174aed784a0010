use std::error::Error;
use std::fmt;

/// Failure conditions raised while building classifier configurations or
/// extracting supervision vectors.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfError {
    /// No configuration is registered under this method name.
    UnknownMethod(String),
    /// A paradigm query named a type that is not a classifier paradigm.
    InvalidParadigm(String),
    /// A supervised training set contains unannotated instances.
    MissingAnnotations,
    /// A supervised training set contains fewer than two classes.
    AtLeastTwoClasses,
    /// A hyperparameter argument failed leaf-specific validation.
    InvalidHyperparam(String),
    /// A deserialized configuration record is missing or mistyping a key.
    MalformedRecord(String),
}

impl fmt::Display for ConfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfError::UnknownMethod(method) => {
                write!(f, "No classifier configuration is registered for '{}'", method)
            }
            ConfError::InvalidParadigm(name) => {
                write!(f, "'{}' is not a classifier paradigm", name)
            }
            ConfError::MissingAnnotations => write!(
                f,
                "Supervised learning models require that all the training \
                 instances are annotated"
            ),
            ConfError::AtLeastTwoClasses => write!(
                f,
                "Supervised learning models require that the training dataset \
                 contains at least two classes"
            ),
            ConfError::InvalidHyperparam(reason) => {
                write!(f, "Invalid hyperparameter: {}", reason)
            }
            ConfError::MalformedRecord(reason) => {
                write!(f, "Malformed configuration record: {}", reason)
            }
        }
    }
}

impl Error for ConfError {}
