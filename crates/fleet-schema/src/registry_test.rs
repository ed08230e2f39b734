use super::*;
use rusqlite::Transaction;

fn noop(_: &Transaction<'_>) -> SchemaResult<()> {
    Ok(())
}

fn steps(versions: &[u32]) -> Vec<Step> {
    versions.iter().map(|&v| Step::new(v, "noop", noop)).collect()
}

fn versions(steps: &[Step]) -> Vec<u32> {
    steps.iter().map(|s| s.version).collect()
}

#[test]
fn empty_registry_has_version_zero() {
    let registry = Registry::try_new(vec![]).unwrap();
    assert_eq!(registry.latest(), 0);
    assert!(registry.is_empty());
    assert!(registry.steps_from(0).is_empty());
}

#[test]
fn steps_from_returns_the_pending_suffix() {
    let registry = Registry::try_new(steps(&[1, 2, 3, 4, 5])).unwrap();
    for v in 0..=5 {
        let expected: Vec<u32> = (v + 1..=5).collect();
        assert_eq!(versions(registry.steps_from(v)), expected, "from {v}");
    }
}

#[test]
fn steps_from_beyond_latest_is_empty() {
    let registry = Registry::try_new(steps(&[1, 2])).unwrap();
    assert!(registry.steps_from(7).is_empty());
}

#[test]
fn steps_between_is_half_open() {
    let registry = Registry::try_new(steps(&[1, 2, 3, 4])).unwrap();
    assert_eq!(versions(registry.steps_between(1, 3).unwrap()), vec![2, 3]);
    assert!(registry.steps_between(3, 3).unwrap().is_empty());
    assert!(registry.steps_between(4, 2).unwrap().is_empty());
    assert!(matches!(
        registry.steps_between(0, 5),
        Err(SchemaError::UnknownVersion(5))
    ));
}

#[test]
fn step_lookup_by_version() {
    let registry = Registry::try_new(steps(&[1, 2, 3])).unwrap();
    assert_eq!(registry.step(2).unwrap().version, 2);
    assert!(matches!(registry.step(0), Err(SchemaError::UnknownVersion(0))));
    assert!(matches!(registry.step(4), Err(SchemaError::UnknownVersion(4))));
}

#[test]
fn duplicate_version_is_rejected() {
    let err = Registry::try_new(steps(&[1, 2, 2, 3])).unwrap_err();
    assert!(matches!(err, SchemaError::Registry(_)));
    assert!(err.to_string().contains("already registered"));
}

#[test]
fn out_of_order_version_is_rejected() {
    assert!(matches!(
        Registry::try_new(steps(&[2, 1])),
        Err(SchemaError::Registry(_))
    ));
    assert!(matches!(
        Registry::try_new(steps(&[1, 3, 2])),
        Err(SchemaError::Registry(_))
    ));
}

#[test]
fn gap_is_rejected() {
    let err = Registry::try_new(steps(&[1, 2, 4])).unwrap_err();
    assert!(err.to_string().contains("version 3 is missing"));
}

#[test]
fn version_zero_is_rejected() {
    assert!(matches!(
        Registry::try_new(steps(&[0, 1])),
        Err(SchemaError::Registry(_))
    ));
}

#[test]
#[should_panic(expected = "Invalid schema registry")]
fn new_panics_on_malformed_catalog() {
    Registry::new(steps(&[1, 1]));
}

#[test]
fn cluster_catalog_is_contiguous() {
    let registry = Registry::cluster();
    assert_eq!(registry.latest() as usize, registry.len());
    assert_eq!(registry.step(1).unwrap().name, "initial");
}
