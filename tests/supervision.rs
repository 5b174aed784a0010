//! Integration tests for paradigm-specific supervision extraction.

use vigil_classifiers::annotations::{Annotations, Instances, Supervision};
use vigil_classifiers::conf::factory::ClassifierConfFactory;
use vigil_classifiers::conf::ClassifierConf;
use vigil_classifiers::error::ConfError;

fn factory() -> ClassifierConfFactory {
    let _ = env_logger::builder().is_test(true).try_init();
    ClassifierConfFactory::with_default_methods()
}

fn family(name: &str) -> Option<String> {
    Some(name.to_string())
}

/// Instances fully annotated with two classes, in both the working and the
/// ground-truth annotations.
fn two_class_instances() -> Instances {
    let annotations = Annotations::new(
        vec![Some(1), Some(0), Some(1), Some(0)],
        vec![
            family("botnet"),
            family("benign"),
            family("ddos"),
            family("benign"),
        ],
    )
    .unwrap();
    Instances::new(annotations.clone(), annotations).unwrap()
}

// ---------------------------------------------------------------------------
// Supervised
// ---------------------------------------------------------------------------

#[test]
fn supervised_binary_extraction_yields_integer_codes() {
    let conf = factory().get_default("LogisticRegression", 4, -1, false).unwrap();
    let vector = conf
        .get_supervision(&two_class_instances(), false, true)
        .unwrap()
        .unwrap();
    assert_eq!(vector, Supervision::Integers(vec![1, 0, 1, 0]));
}

#[test]
fn supervised_multiclass_extraction_yields_family_names() {
    let conf = factory().get_default("LogisticRegression", 4, -1, true).unwrap();
    let vector = conf
        .get_supervision(&two_class_instances(), false, true)
        .unwrap()
        .unwrap();
    let families = vector.as_families().unwrap();
    assert_eq!(families, &["botnet", "benign", "ddos", "benign"]);
}

#[test]
fn supervised_extraction_rejects_single_class_data_when_checked() {
    let annotations =
        Annotations::new(vec![Some(1), Some(1)], vec![family("botnet"), family("botnet")])
            .unwrap();
    let instances = Instances::new(annotations.clone(), annotations).unwrap();
    let conf = factory().get_default("GradientBoosting", 4, -1, false).unwrap();

    let err = conf.get_supervision(&instances, false, true).unwrap_err();
    assert_eq!(err, ConfError::AtLeastTwoClasses);
    // without the check the single class passes through
    let vector = conf.get_supervision(&instances, false, false).unwrap().unwrap();
    assert_eq!(vector, Supervision::Integers(vec![1, 1]));
}

#[test]
fn supervised_extraction_rejects_missing_annotations_regardless_of_check() {
    let annotations =
        Annotations::new(vec![Some(1), None, Some(0)], vec![None, None, None]).unwrap();
    let instances = Instances::new(annotations.clone(), annotations).unwrap();
    let conf = factory().get_default("RandomForest", 4, -1, false).unwrap();

    for check in [true, false] {
        let err = conf.get_supervision(&instances, false, check).unwrap_err();
        assert_eq!(err, ConfError::MissingAnnotations);
    }
}

#[test]
fn ground_truth_flag_selects_the_annotation_set() {
    let working = Annotations::unannotated(4);
    let truth = Annotations::new(
        vec![Some(1), Some(0), Some(1), Some(0)],
        vec![None, None, None, None],
    )
    .unwrap();
    let instances = Instances::new(working, truth).unwrap();
    let conf = factory().get_default("LogisticRegression", 4, -1, false).unwrap();

    let err = conf.get_supervision(&instances, false, true).unwrap_err();
    assert_eq!(err, ConfError::MissingAnnotations);
    let vector = conf.get_supervision(&instances, true, true).unwrap().unwrap();
    assert_eq!(vector, Supervision::Integers(vec![1, 0, 1, 0]));
}

// ---------------------------------------------------------------------------
// Semi-supervised
// ---------------------------------------------------------------------------

#[test]
fn semi_supervised_extraction_substitutes_the_sentinel() {
    let annotations = Annotations::new(
        vec![Some(1), None, Some(0), None, Some(1)],
        vec![None; 5],
    )
    .unwrap();
    let instances = Instances::new(annotations.clone(), annotations).unwrap();
    let conf = factory().get_default("LabelPropagation", 4, -1, false).unwrap();

    let vector = conf.get_supervision(&instances, false, true).unwrap().unwrap();
    assert_eq!(vector, Supervision::Integers(vec![1, -1, 0, -1, 1]));
}

#[test]
fn semi_supervised_extraction_accepts_fully_unlabeled_data() {
    let annotations = Annotations::unannotated(3);
    let instances = Instances::new(annotations.clone(), annotations).unwrap();
    let conf = factory().get_default("LabelPropagation", 4, -1, false).unwrap();

    let vector = conf.get_supervision(&instances, false, true).unwrap().unwrap();
    assert_eq!(vector, Supervision::Integers(vec![-1, -1, -1]));
}

// ---------------------------------------------------------------------------
// Unsupervised
// ---------------------------------------------------------------------------

#[test]
fn unsupervised_extraction_returns_nothing_without_ground_truth() {
    let conf = factory().get_default("IsolationForest", 4, -1, false).unwrap();
    let vector = conf
        .get_supervision(&two_class_instances(), false, true)
        .unwrap();
    assert!(vector.is_none());
}

#[test]
fn unsupervised_extraction_skips_the_two_class_check() {
    let truth = Annotations::new(vec![Some(1), Some(1)], vec![None, None]).unwrap();
    let instances = Instances::from_ground_truth(truth);
    let conf = factory().get_default("IsolationForest", 4, -1, false).unwrap();

    let vector = conf.get_supervision(&instances, true, true).unwrap().unwrap();
    assert_eq!(vector, Supervision::Integers(vec![1, 1]));
}
