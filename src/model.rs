use ndarray::{Array1, Array2};

/// Capability contract a trained model must honor for coefficient
/// extraction. Configurations whose feature-importance kind is "weight"
/// expect `coef`, those whose kind is "score" expect
/// `feature_importances`.
pub trait TrainedModel {
    /// Per-class linear coefficient matrix, one row per class.
    fn coef(&self) -> Option<Array2<f32>> {
        None
    }

    /// Per-feature importance scores.
    fn feature_importances(&self) -> Option<Array1<f32>> {
        None
    }
}

/// Influence-per-feature data extracted from a trained model.
#[derive(Debug, Clone, PartialEq)]
pub enum Coefficients {
    /// Full per-class coefficient matrix (multiclass linear models).
    Matrix(Array2<f32>),
    /// A single coefficient or importance vector.
    Vector(Array1<f32>),
}
