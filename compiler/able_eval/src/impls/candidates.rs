//! Candidate collection and impl-pool method lookup.

use std::collections::BTreeSet;
use std::sync::Arc;

use able_types::{concreteness, match_template, Bindings, Name, TypeDescriptor};
use smallvec::SmallVec;

use super::{select, ImplEntry, ImplSlot};
use crate::errors::{ambiguous_impls, private_method, ResolveError, ResolveResult};
use crate::resolver::Resolver;
use crate::Callable;

/// A slot whose template matched, with its bindings and score.
#[derive(Clone, Debug)]
pub struct ImplCandidate<'a> {
    pub slot: &'a ImplSlot,
    pub bindings: Bindings,
    pub score: i64,
}

impl ImplCandidate<'_> {
    #[inline]
    pub fn entry(&self) -> &Arc<ImplEntry> {
        &self.slot.entry
    }
}

/// Most lookups see one or two matching impls.
pub(crate) type Candidates<'a> = SmallVec<[ImplCandidate<'a>; 4]>;

/// A method found in the impl pool.
#[derive(Clone, Debug)]
pub struct MethodMatch {
    pub callable: Callable,
    pub entry: Arc<ImplEntry>,
    pub bindings: Bindings,
}

/// The impl selected for an interface, regardless of method.
#[derive(Clone, Debug)]
pub struct ImplMatch {
    pub entry: Arc<ImplEntry>,
    pub bindings: Bindings,
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl<'a> Resolver<'a> {
    /// Every impl applicable to `descriptor`, optionally restricted to one
    /// interface and to impls providing `method`.
    ///
    /// A candidate whose constraints fail is dropped. The first such failure
    /// is returned only when nothing else matched. Any other error while
    /// checking a constraint, such as an ambiguous bound, aborts the lookup.
    pub(crate) fn collect_candidates(
        &self,
        descriptor: &TypeDescriptor,
        interface: Option<&Name>,
        method: Option<&Name>,
    ) -> ResolveResult<Candidates<'a>> {
        let impls = self.impls;
        let actual = descriptor.to_type_expr();
        let mut found: Candidates<'a> = SmallVec::new();
        let mut constraint_error: Option<ResolveError> = None;

        for slot in impls.slots_for(&descriptor.name) {
            let entry = &slot.entry;
            if interface.is_some_and(|filter| entry.interface != *filter) {
                continue;
            }
            if method.is_some_and(|m| !entry.provides_method(m, self.interfaces)) {
                continue;
            }
            // Two members of one union may share a bucket.
            if found.iter().any(|c| Arc::ptr_eq(c.entry(), entry)) {
                continue;
            }

            let mut bindings = Bindings::default();
            if slot.variant.needs_match()
                && !match_template(
                    &slot.variant.template,
                    &actual,
                    &entry.generic_names,
                    &mut bindings,
                )
            {
                continue;
            }
            if entry
                .declared_params
                .iter()
                .any(|p| !bindings.contains_key(p) && !entry.param_bound_by_interface(p))
            {
                continue;
            }
            match self.enforce_constraints(entry, &bindings) {
                Ok(()) => {}
                Err(err) if err.is_constraint_failure() => {
                    tracing::trace!(
                        candidate = %entry.description(),
                        error = %err,
                        "constraint failed"
                    );
                    constraint_error.get_or_insert(err);
                    continue;
                }
                Err(err) => return Err(err),
            }

            let score = self.score(slot, &bindings);
            tracing::trace!(candidate = %entry.description(), score, "impl candidate");
            found.push(ImplCandidate {
                slot,
                bindings,
                score,
            });
        }

        match constraint_error {
            Some(err) if found.is_empty() => Err(err),
            _ => Ok(found),
        }
    }

    fn score(&self, slot: &ImplSlot, bindings: &Bindings) -> i64 {
        let weights = &self.config.weights;
        let entry = &slot.entry;
        let concrete = i64::from(concreteness(&slot.variant.template, &entry.generic_names));
        weights.concreteness * concrete
            + weights.constraint * count(entry.constraints.len())
            + weights.binding * count(bindings.len())
            - weights.union_variant * count(entry.union_signatures.len())
            - weights.default_only * i64::from(entry.default_only)
    }

    /// Check every constraint whose parameter is bound to a nominal type.
    fn enforce_constraints(&self, entry: &ImplEntry, bindings: &Bindings) -> ResolveResult<()> {
        for constraint in &entry.constraints {
            let Some(bound) = bindings.get(&constraint.type_param) else {
                continue;
            };
            let Some(subject) = TypeDescriptor::from_type_expr(bound) else {
                continue;
            };
            self.ensure_satisfies(&subject, &constraint.interface, &constraint.type_param)?;
        }
        Ok(())
    }

    /// Look `method` up in the impl pool.
    ///
    /// With an interface filter, impls of the filter itself are preferred;
    /// impls of its bases or of interfaces extending it are used only when
    /// the filter has none.
    pub(crate) fn find_method(
        &self,
        descriptor: &TypeDescriptor,
        method: &Name,
        interface: Option<&Name>,
    ) -> ResolveResult<Option<MethodMatch>> {
        let mut candidates = match interface {
            None => self.collect_candidates(descriptor, None, Some(method))?,
            Some(filter) => match self.collect_related(descriptor, method, filter)? {
                Some(found) => found,
                None => return Ok(None),
            },
        };
        if candidates.is_empty() {
            return Ok(None);
        }
        if candidates.len() > 1 && candidates.iter().any(|c| c.entry().defines_method(method)) {
            candidates.retain(|c| c.entry().defines_method(method));
        }

        let selection = select(&candidates, self.interfaces);
        let Some(best) = selection.best else {
            return Err(self.ambiguity(descriptor, &candidates, &selection.tied, interface));
        };
        let winner = &candidates[best];
        let Some(callable) = winner.entry().method_or_default(method, self.interfaces) else {
            return Ok(None);
        };
        if callable.is_private() {
            return Err(private_method(method, descriptor));
        }
        Ok(Some(MethodMatch {
            callable,
            entry: Arc::clone(winner.entry()),
            bindings: winner.bindings.clone(),
        }))
    }

    /// Candidates for `method` under `filter` and its related interfaces.
    /// `None` when nothing matched and no constraint error was recorded.
    fn collect_related(
        &self,
        descriptor: &TypeDescriptor,
        method: &Name,
        filter: &Name,
    ) -> ResolveResult<Option<Candidates<'a>>> {
        let mut direct: Candidates<'a> = SmallVec::new();
        let mut related: Candidates<'a> = SmallVec::new();
        let mut first_error = None;
        for iface in self.related_interfaces(filter) {
            match self.collect_candidates(descriptor, Some(&iface), Some(method)) {
                Ok(found) if iface == *filter => direct.extend(found),
                Ok(found) => related.extend(found),
                Err(err) if err.is_constraint_failure() => {
                    first_error.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }
        if !direct.is_empty() {
            return Ok(Some(direct));
        }
        if !related.is_empty() {
            return Ok(Some(related));
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// The impl of `interface` selected for `descriptor`.
    pub(crate) fn lookup_impl(
        &self,
        descriptor: &TypeDescriptor,
        interface: &Name,
    ) -> ResolveResult<Option<ImplMatch>> {
        let candidates = self.collect_candidates(descriptor, Some(interface), None)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let selection = select(&candidates, self.interfaces);
        let Some(best) = selection.best else {
            return Err(self.ambiguity(descriptor, &candidates, &selection.tied, Some(interface)));
        };
        let winner = &candidates[best];
        Ok(Some(ImplMatch {
            entry: Arc::clone(winner.entry()),
            bindings: winner.bindings.clone(),
        }))
    }

    fn ambiguity(
        &self,
        descriptor: &TypeDescriptor,
        candidates: &[ImplCandidate<'_>],
        tied: &[usize],
        filter: Option<&Name>,
    ) -> ResolveError {
        let tied: Vec<&ImplCandidate<'_>> = tied.iter().filter_map(|&i| candidates.get(i)).collect();
        let descriptions: BTreeSet<String> = tied.iter().map(|c| c.entry().description()).collect();
        let interface = match (tied.first(), filter) {
            (Some(first), _) => first.entry().interface.clone(),
            (None, Some(filter)) => filter.clone(),
            (None, None) => Name::new("<unknown>"),
        };
        tracing::debug!(
            interface = %interface,
            type_name = %descriptor,
            tied = descriptions.len(),
            "ambiguous impl selection"
        );
        ambiguous_impls(&interface, descriptor, descriptions.into_iter().collect())
    }
}
