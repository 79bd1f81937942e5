//! Well-formedness: linearity and coherence.
//!
//! Grounded on `original_source/multiparty/multiparty.go`'s `linear`,
//! `coherent`, and `unfold` — the dependency predicates (`II`/`IO`/`OO`)
//! live as methods on `Prefix` (see `types::primitives`).

use std::collections::BTreeMap;

use crate::projection::project;
use crate::types::{GlobalType, NameType, Prefix};

/// Unfold every `Recursive` node exactly once. Re-entering the same
/// binder is a fixed point and stops expansion, so the result is finite.
///
/// This mirrors the Go original's `unfold`: a `seen`-environment mapping a
/// bound name to the `Recursive` node it came from, with save/restore
/// around the body to implement standard alpha-shadowing (SPEC_FULL.md
/// Open Question 4).
pub fn unfold_once(gt: &GlobalType) -> GlobalType {
    unfold_with_env(gt, &mut BTreeMap::new())
}

fn unfold_with_env(gt: &GlobalType, env: &mut BTreeMap<NameType, GlobalType>) -> GlobalType {
    match gt {
        GlobalType::Value { prefix, sort, next } => GlobalType::Value {
            prefix: prefix.clone(),
            sort: sort.clone(),
            next: Box::new(unfold_with_env(next, env)),
        },
        GlobalType::Branching { prefix, branches } => GlobalType::Branching {
            prefix: prefix.clone(),
            branches: branches
                .iter()
                .map(|(l, g)| (l.clone(), unfold_with_env(g, env)))
                .collect(),
        },
        GlobalType::Parallel { a, b } => GlobalType::Parallel {
            a: Box::new(unfold_with_env(a, env)),
            b: Box::new(unfold_with_env(b, env)),
        },
        GlobalType::Recursive { bind, body } => {
            if let Some(prev) = env.get(bind).cloned() {
                if &prev != gt {
                    // A different Recursive shadows the same name: descend
                    // under the new binding, then restore the old one.
                    env.insert(bind.clone(), gt.clone());
                    let unfolded_body = unfold_with_env(body, env);
                    env.insert(bind.clone(), prev);
                    GlobalType::Recursive {
                        bind: bind.clone(),
                        body: Box::new(unfolded_body),
                    }
                } else {
                    // Already unfolded this binder once; stop to keep the
                    // result finite.
                    gt.clone()
                }
            } else {
                env.insert(bind.clone(), gt.clone());
                let unfolded_body = unfold_with_env(body, env);
                GlobalType::Recursive {
                    bind: bind.clone(),
                    body: Box::new(unfolded_body),
                }
            }
        }
        GlobalType::Name(n) => env.get(n).cloned().unwrap_or_else(|| GlobalType::Name(n.clone())),
        GlobalType::End => GlobalType::End,
    }
}

/// `InputDependency`: every earlier prefix on the same channel must be
/// `II` or `IO` with `cur`, except the *last* one, which must be strictly
/// `II` (SPEC_FULL.md Open Question 3).
fn input_dependency(firsts: &[Prefix], cur: &Prefix) -> bool {
    if firsts.is_empty() {
        return true;
    }
    for first in &firsts[..firsts.len() - 1] {
        if !(first.input_input(cur) || first.input_output(cur)) {
            return false;
        }
    }
    firsts[firsts.len() - 1].input_input(cur)
}

/// `OutputDependency`: every prefix on the same channel must be `IO` or
/// `OO` with `cur`.
fn output_dependency(firsts: &[Prefix], cur: &Prefix) -> bool {
    firsts.iter().all(|first| first.input_output(cur) || first.output_output(cur))
}

fn filter_shared_channel(lessthan: &[Prefix], cur: &Prefix) -> Vec<Prefix> {
    lessthan.iter().filter(|p| p.channel == cur.channel).cloned().collect()
}

/// Is `original` linear? Unfolds once, then walks the tree carrying the
/// ordered list of prefixes seen so far (`lessthan`).
pub fn is_linear(original: &GlobalType) -> bool {
    let unfolded = unfold_once(original);
    linear_walk(&unfolded, &[])
}

fn linear_walk(gt: &GlobalType, lessthan: &[Prefix]) -> bool {
    match gt {
        GlobalType::Value { prefix, next, .. } => {
            let filtered = filter_shared_channel(lessthan, prefix);
            if !(input_dependency(&filtered, prefix) && output_dependency(&filtered, prefix)) {
                return false;
            }
            let mut extended = lessthan.to_vec();
            extended.push(prefix.clone());
            linear_walk(next, &extended)
        }
        GlobalType::Branching { prefix, branches } => {
            let filtered = filter_shared_channel(lessthan, prefix);
            if !(input_dependency(&filtered, prefix) && output_dependency(&filtered, prefix)) {
                return false;
            }
            let mut extended = lessthan.to_vec();
            extended.push(prefix.clone());
            branches.values().all(|g| linear_walk(g, &extended))
        }
        GlobalType::Parallel { a, b } => {
            // Each side must be linear when crossed against every prefix
            // path of the other side (both orderings, since execution
            // order between the two sides is unconstrained).
            b.prefixes().iter().all(|path| {
                let mut extended = lessthan.to_vec();
                extended.extend(path.iter().cloned());
                linear_walk(a, &extended)
            }) && a.prefixes().iter().all(|path| {
                let mut extended = lessthan.to_vec();
                extended.extend(path.iter().cloned());
                linear_walk(b, &extended)
            })
        }
        GlobalType::Recursive { body, .. } => linear_walk(body, lessthan),
        GlobalType::Name(_) | GlobalType::End => true,
    }
}

/// Coherent iff linear *and* `project(p)` succeeds for every participant.
pub fn is_coherent(original: &GlobalType) -> bool {
    if !is_linear(original) {
        return false;
    }
    let unfolded = unfold_once(original);
    unfolded.participants().iter().all(|p| project(&unfolded, p).is_ok())
}
