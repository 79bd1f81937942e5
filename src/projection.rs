//! Projection: map a global type to a local type for one participant.

use std::collections::BTreeMap;

use crate::types::{GlobalType, Label, LocalType, Participant, ProjectionError, ProjectionResult};

/// Project `global` onto `participant`'s local type.
///
/// See `spec.md` §4.2 for the rule table this function implements
/// structurally, one `GlobalType` variant at a time.
pub fn project(global: &GlobalType, participant: &Participant) -> ProjectionResult {
    ProjectionContext { participant }.project(global)
}

struct ProjectionContext<'a> {
    participant: &'a Participant,
}

impl<'a> ProjectionContext<'a> {
    fn project(&self, global: &GlobalType) -> ProjectionResult {
        match global {
            GlobalType::Value { prefix, sort, next } => {
                if &prefix.p1 == self.participant {
                    Ok(LocalType::send(prefix.channel.clone(), sort.clone(), self.project(next)?))
                } else if &prefix.p2 == self.participant {
                    Ok(LocalType::receive(prefix.channel.clone(), sort.clone(), self.project(next)?))
                } else {
                    self.project(next)
                }
            }

            GlobalType::Branching { prefix, branches } => {
                if &prefix.p1 == self.participant {
                    Ok(LocalType::Selection {
                        channel: prefix.channel.clone(),
                        branches: self.project_branches(branches)?,
                    })
                } else if &prefix.p2 == self.participant {
                    Ok(LocalType::Branching {
                        channel: prefix.channel.clone(),
                        branches: self.project_branches(branches)?,
                    })
                } else {
                    self.project_uninvolved_choice(branches)
                }
            }

            GlobalType::Parallel { a, b } => {
                let in_a = a.mentions(self.participant);
                let in_b = b.mentions(self.participant);
                match (in_a, in_b) {
                    (true, true) => Err(ProjectionError::new(format!(
                        "participant {} appears on both sides of a Parallel",
                        self.participant
                    ))),
                    (true, false) => self.project(a),
                    (false, true) => self.project(b),
                    (false, false) => Ok(LocalType::End),
                }
            }

            GlobalType::Recursive { bind, body } => {
                // Invariant 4: if the participant never appears in the
                // body, the projection collapses to End. Gated on the
                // *source* body rather than on what it projects to: a
                // body that doesn't mention the participant can still
                // project to `Name(bind)` rather than `End` (e.g. a body
                // that is itself just `Name(bind)`), and `is_end()` would
                // miss that case.
                if !body.mentions(self.participant) {
                    Ok(LocalType::End)
                } else {
                    Ok(LocalType::recursive(bind.clone(), self.project(body)?))
                }
            }

            GlobalType::Name(n) => Ok(LocalType::Name(n.clone())),

            GlobalType::End => Ok(LocalType::End),
        }
    }

    fn project_branches(
        &self,
        branches: &BTreeMap<Label, GlobalType>,
    ) -> Result<BTreeMap<Label, LocalType>, ProjectionError> {
        branches
            .iter()
            .map(|(label, g)| Ok((label.clone(), self.project(g)?)))
            .collect()
    }

    /// Project a `Branching` onto a non-participant: succeeds only if
    /// every branch projects to a structurally equal local type (branch
    /// uniformity, invariant 5). Strict pairwise equality — see
    /// DESIGN.md / SPEC_FULL.md Open Question 2.
    fn project_uninvolved_choice(&self, branches: &BTreeMap<Label, GlobalType>) -> ProjectionResult {
        let mut projected: Vec<(Label, LocalType)> = Vec::with_capacity(branches.len());
        for (label, g) in branches {
            projected.push((label.clone(), self.project(g)?));
        }

        let (first_label, first) = projected
            .first()
            .expect("Branching always has at least one branch")
            .clone();

        for (label, candidate) in &projected[1..] {
            if !candidate.equals(&first) {
                return Err(ProjectionError::new(format!(
                    "branches {} and {} disagree for non-participant {}",
                    first_label, label, self.participant
                )));
            }
        }

        Ok(first)
    }
}
