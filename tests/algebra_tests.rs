//! Structural properties of the global/local type algebra: substitution,
//! unfolding, equality, and the enumeration helpers the linearity and
//! projection passes depend on.

use mpst_core::{GlobalType, LocalType, Prefix};

fn ab(channel: &str) -> Prefix {
    Prefix::new("A", "B", channel)
}

fn bc(channel: &str) -> Prefix {
    Prefix::new("B", "C", channel)
}

#[test]
fn substitute_replaces_matching_name_only() {
    let body = GlobalType::Name("X".into());
    let replacement = GlobalType::value(ab("ch"), "int", GlobalType::End);

    let substituted = body.substitute(&"X".into(), &replacement);
    assert_eq!(substituted, replacement);

    let unrelated = GlobalType::Name("Y".into());
    assert_eq!(unrelated.substitute(&"X".into(), &replacement), unrelated);
}

#[test]
fn substitute_does_not_descend_into_a_shadowing_recursive() {
    let inner = GlobalType::recursive("X", GlobalType::Name("X".into()));
    let outer = GlobalType::value(ab("ch"), "int", inner.clone());

    // Substituting X in `outer` must leave the inner `mu X. X` untouched,
    // since its own binder shadows the same name.
    let replacement = GlobalType::End;
    let substituted = outer.substitute(&"X".into(), &replacement);
    match substituted {
        GlobalType::Value { next, .. } => assert_eq!(*next, inner),
        _ => panic!("expected a Value node"),
    }
}

#[test]
fn unfold_one_level_substitutes_the_body_with_itself() {
    let rec = GlobalType::recursive(
        "X",
        GlobalType::value(ab("ch"), "int", GlobalType::Name("X".into())),
    );
    let unfolded = rec.unfold_one_level();
    let expected = GlobalType::value(ab("ch"), "int", rec.clone());
    assert_eq!(unfolded, expected);
}

#[test]
fn unfold_one_level_is_identity_on_non_recursive_nodes() {
    let value = GlobalType::value(ab("ch"), "int", GlobalType::End);
    assert_eq!(value.unfold_one_level(), value);
    assert_eq!(GlobalType::End.unfold_one_level(), GlobalType::End);
}

#[test]
fn equals_is_reflexive_symmetric_and_transitive() {
    let a = GlobalType::value(ab("ch"), "int", GlobalType::End);
    let b = a.clone();
    let c = b.clone();

    assert!(a.equals(&a));
    assert!(a.equals(&b) && b.equals(&a));
    assert!(a.equals(&b) && b.equals(&c) && a.equals(&c));

    let different = GlobalType::value(ab("ch"), "string", GlobalType::End);
    assert!(!a.equals(&different));
}

#[test]
fn channels_are_sorted_and_deduplicated() {
    let gt = GlobalType::value(
        ab("ch2"),
        "int",
        GlobalType::value(bc("ch1"), "bool", GlobalType::value(ab("ch2"), "int", GlobalType::End)),
    );
    assert_eq!(
        gt.channels(),
        vec!["ch1".into(), "ch2".into()]
    );
}

#[test]
fn participants_collects_every_role_mentioned() {
    let gt = GlobalType::value(ab("ch1"), "int", GlobalType::value(bc("ch2"), "bool", GlobalType::End));
    assert_eq!(gt.participants(), vec!["A".into(), "B".into(), "C".into()]);
}

#[test]
fn mentions_is_true_only_for_roles_appearing_in_a_prefix() {
    let gt = GlobalType::value(ab("ch1"), "int", GlobalType::End);
    assert!(gt.mentions(&"A".into()));
    assert!(gt.mentions(&"B".into()));
    assert!(!gt.mentions(&"C".into()));
}

#[test]
fn local_type_substitution_mirrors_global_type() {
    let body = LocalType::Name("X".into());
    let replacement = LocalType::send("ch", "int", LocalType::End);
    assert_eq!(body.substitute(&"X".into(), &replacement), replacement);
}

#[test]
fn local_type_is_end_only_matches_end() {
    assert!(LocalType::End.is_end());
    assert!(!LocalType::send("ch", "int", LocalType::End).is_end());
}
