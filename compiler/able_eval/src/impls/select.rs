//! Ranking of matching impl candidates.
//!
//! Candidates are ordered by score first. Equal scores fall through two
//! tie-breaks: union width, then constraint strength. Whatever is left
//! undominated after that is reported as ambiguous, never picked.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use super::ImplCandidate;
use crate::interface::InterfaceTable;

/// Outcome of [`select`]: a unique best candidate, or the tied group.
///
/// Both fields index into the candidate slice handed to `select`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub best: Option<usize>,
    pub tied: Vec<usize>,
}

impl Selection {
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.best.is_none() && !self.tied.is_empty()
    }
}

/// Constraint keys of one candidate, `param->Interface` for every interface
/// in each bound's base closure.
fn constraint_keys(candidate: &ImplCandidate<'_>, interfaces: &InterfaceTable) -> BTreeSet<String> {
    candidate
        .entry()
        .constraints
        .iter()
        .flat_map(|c| {
            interfaces
                .constraint_closure(&c.interface)
                .into_iter()
                .map(move |iface| format!("{}->{iface}", c.type_param))
        })
        .collect()
}

/// `Greater` when `a` is strictly more specific than `b`.
pub fn compare_candidates(
    a: &ImplCandidate<'_>,
    b: &ImplCandidate<'_>,
    interfaces: &InterfaceTable,
) -> Ordering {
    compare_with_keys(
        a,
        b,
        &constraint_keys(a, interfaces),
        &constraint_keys(b, interfaces),
    )
}

fn compare_with_keys(
    a: &ImplCandidate<'_>,
    b: &ImplCandidate<'_>,
    a_keys: &BTreeSet<String>,
    b_keys: &BTreeSet<String>,
) -> Ordering {
    match a.score.cmp(&b.score) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    match compare_union_width(a, b) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    if is_strict_superset(a_keys, b_keys) {
        Ordering::Greater
    } else if is_strict_superset(b_keys, a_keys) {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// A non-union target beats a union one; of two unions, a strict subset wins.
fn compare_union_width(a: &ImplCandidate<'_>, b: &ImplCandidate<'_>) -> Ordering {
    let (a_sigs, b_sigs) = (&a.entry().union_signatures, &b.entry().union_signatures);
    match (a_sigs.is_empty(), b_sigs.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let a_set: FxHashSet<&String> = a_sigs.iter().collect();
            let b_set: FxHashSet<&String> = b_sigs.iter().collect();
            if a_set.len() < b_set.len() && a_set.is_subset(&b_set) {
                Ordering::Greater
            } else if b_set.len() < a_set.len() && b_set.is_subset(&a_set) {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        }
    }
}

fn is_strict_superset(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    a.len() > b.len() && a.is_superset(b)
}

/// Pick the most specific candidate.
///
/// Only candidates with the top score compete. Among those, the ones no
/// other competitor beats form the undominated set; a singleton is the
/// winner, anything larger is an ambiguity. An empty input gives an empty
/// selection.
pub fn select(candidates: &[ImplCandidate<'_>], interfaces: &InterfaceTable) -> Selection {
    let Some(top) = candidates.iter().map(|c| c.score).max() else {
        return Selection::default();
    };
    let contenders: Vec<usize> = (0..candidates.len())
        .filter(|&i| candidates[i].score == top)
        .collect();
    if let [only] = contenders.as_slice() {
        return Selection {
            best: Some(*only),
            tied: Vec::new(),
        };
    }

    let keys: Vec<BTreeSet<String>> = contenders
        .iter()
        .map(|&i| constraint_keys(&candidates[i], interfaces))
        .collect();
    let undominated: Vec<usize> = contenders
        .iter()
        .enumerate()
        .filter(|&(pos, &i)| {
            !contenders.iter().enumerate().any(|(other_pos, &j)| {
                other_pos != pos
                    && compare_with_keys(
                        &candidates[j],
                        &candidates[i],
                        &keys[other_pos],
                        &keys[pos],
                    ) == Ordering::Greater
            })
        })
        .map(|(_, &i)| i)
        .collect();

    match undominated.as_slice() {
        [winner] => Selection {
            best: Some(*winner),
            tied: Vec::new(),
        },
        // Only a dominance cycle empties the set; report every contender.
        [] => Selection {
            best: None,
            tied: contenders,
        },
        _ => Selection {
            best: None,
            tied: undominated,
        },
    }
}
