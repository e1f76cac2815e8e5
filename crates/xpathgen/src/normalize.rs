//! Rewrite passes that bring a comprehension into emitter-ready form.
//!
//! Passes run in a fixed order. Boolean yields lift into a comparison over
//! the whole comprehension. Quantifier calls are reduced: `any` unwraps,
//! `all` becomes its double-negation form, `len` stays as a count. Each
//! clause predicate is split at top-level conjunctions, normalized,
//! relocated to the clause binding the outermost source name it references,
//! and the survivors are folded back into at most one predicate per clause.
//! Membership tests against known finite sequences expand into equality
//! disjunctions.

use std::mem;

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::ast::{Binding, Clause, CmpOp, Comprehension, Environment, Expr, Ident, Literal};
use crate::error::CompileError;

/// Normalizes `comprehension` into an emitter-ready expression: an
/// [`Expr::Comprehension`], or the comparison wrapping one when the yield
/// was a truth test. Normalizing an already normalized tree is identity.
pub fn normalize(comprehension: Comprehension, env: &Environment) -> Result<Expr, CompileError> {
    debug!(clauses = comprehension.clauses.len(), "normalizing comprehension");
    Normalizer { env }.comprehension(comprehension)
}

struct Normalizer<'a> {
    env: &'a Environment,
}

impl Normalizer<'_> {
    fn comprehension(&self, comprehension: Comprehension) -> Result<Expr, CompileError> {
        let Comprehension { return_expr, clauses } = comprehension;
        match return_expr {
            // A comparison yield makes the comprehension a truth test: yield
            // the left operand and lift the operator over the whole
            // comprehension.
            Expr::Comparison { left, op, right } => {
                let lifted = self.comprehension(Comprehension { return_expr: *left, clauses })?;
                self.comparison(lifted, op, *right)
            }
            Expr::Not(inner) => match *inner {
                Expr::Comparison { left, op, right } => {
                    let lifted =
                        self.comprehension(Comprehension { return_expr: *left, clauses })?;
                    self.comparison(lifted, op.negated(), *right)
                }
                other => Err(CompileError::unsupported(format!(
                    "negation of {} as a comprehension yield",
                    other.kind_name()
                ))),
            },
            Expr::And(_) | Expr::Or(_) => Err(CompileError::unsupported(
                "conjunction or disjunction as a comprehension yield",
            )),
            return_expr => {
                let clauses = self.clauses(clauses)?;
                Ok(Expr::Comprehension(Box::new(Comprehension { return_expr, clauses })))
            }
        }
    }

    /// Runs the per-clause passes: conjunction decomposition, predicate
    /// normalization, redistribution, re-conjunction.
    fn clauses(&self, mut clauses: Vec<Clause>) -> Result<Vec<Clause>, CompileError> {
        for clause in &clauses {
            if !matches!(clause.source, Expr::Ident(_) | Expr::Attribute { .. }) {
                return Err(CompileError::unsupported(format!(
                    "iteration over {}",
                    clause.source.kind_name()
                )));
            }
        }
        let ranked = ranked_source_names(&clauses);

        let mut buckets: Vec<Vec<Expr>> = Vec::with_capacity(clauses.len());
        for clause in &mut clauses {
            let mut conjuncts = Vec::new();
            for predicate in mem::take(&mut clause.predicates) {
                split_conjunction(predicate, &mut conjuncts);
            }
            let mut normalized = Vec::with_capacity(conjuncts.len());
            for conjunct in conjuncts {
                normalized.push(self.expr(conjunct)?);
            }
            buckets.push(normalized);
        }

        // Relocated conjuncts land after the destination clause's own.
        let mut staying: Vec<Vec<Expr>> = vec![Vec::new(); clauses.len()];
        let mut moved: Vec<(usize, Expr)> = Vec::new();
        for (index, bucket) in buckets.into_iter().enumerate() {
            for conjunct in bucket {
                let target = destination(&conjunct, index, &clauses, &ranked);
                if target == index {
                    staying[index].push(conjunct);
                } else {
                    trace!(
                        from = %clauses[index].var,
                        to = %clauses[target].var,
                        "relocating predicate"
                    );
                    moved.push((target, conjunct));
                }
            }
        }
        for (target, conjunct) in moved {
            staying[target].push(conjunct);
        }

        for (clause, conjuncts) in clauses.iter_mut().zip(staying) {
            clause.predicates = refold(conjuncts);
        }
        Ok(clauses)
    }

    fn expr(&self, expr: Expr) -> Result<Expr, CompileError> {
        match expr {
            Expr::Call { function, arg } => self.call(function, *arg),
            Expr::Comprehension(comprehension) => self.comprehension(*comprehension),
            Expr::Comparison { left, op, right } => {
                let left = self.expr(*left)?;
                self.comparison(left, op, *right)
            }
            Expr::Not(inner) => Ok(Expr::Not(Box::new(self.expr(*inner)?))),
            Expr::And(terms) => Ok(Expr::And(self.exprs(terms)?)),
            Expr::Or(terms) => Ok(Expr::Or(self.exprs(terms)?)),
            leaf @ (Expr::Ident(_)
            | Expr::Attribute { .. }
            | Expr::Literal(_)
            | Expr::HyphenJoin(_)) => Ok(leaf),
        }
    }

    fn exprs(&self, terms: Vec<Expr>) -> Result<Vec<Expr>, CompileError> {
        terms.into_iter().map(|term| self.expr(term)).collect()
    }

    fn call(&self, function: Ident, arg: Expr) -> Result<Expr, CompileError> {
        match function.as_str() {
            // An existential test is the comprehension itself.
            "any" => match arg {
                Expr::Comprehension(comprehension) => self.comprehension(*comprehension),
                other => {
                    Err(CompileError::unsupported(format!("`any` over {}", other.kind_name())))
                }
            },
            "all" => match arg {
                Expr::Comprehension(comprehension) => {
                    let negated = eliminate_universal(*comprehension)?;
                    self.expr(negated)
                }
                other => {
                    Err(CompileError::unsupported(format!("`all` over {}", other.kind_name())))
                }
            },
            "len" | "count" => {
                let arg = self.expr(arg)?;
                Ok(Expr::Call { function, arg: Box::new(arg) })
            }
            other => Err(CompileError::unsupported(format!(
                "call to `{other}` (supported: any, all, len)"
            ))),
        }
    }

    /// `left` must already be normalized; `right` is normalized here before
    /// the membership expansion gets a look at it.
    fn comparison(&self, left: Expr, op: CmpOp, right: Expr) -> Result<Expr, CompileError> {
        let right = self.expr(right)?;
        if matches!(op, CmpOp::In | CmpOp::NotIn) {
            return self.membership(left, op, right);
        }
        Ok(Expr::Comparison { left: Box::new(left), op, right: Box::new(right) })
    }

    /// Expands membership over a known finite sequence into a disjunction of
    /// equalities, one per element in order. A string right-hand side stays
    /// a comparison, which the emitter renders as a substring test; so does
    /// anything opaque.
    fn membership(&self, left: Expr, op: CmpOp, right: Expr) -> Result<Expr, CompileError> {
        let items = match self.resolve(right) {
            Expr::Literal(Literal::Seq(items)) => items,
            right => {
                return Ok(Expr::Comparison { left: Box::new(left), op, right: Box::new(right) });
            }
        };
        if items.is_empty() {
            return Err(CompileError::unsupported("membership test over an empty sequence"));
        }
        let mut alternatives: Vec<Expr> = items
            .into_iter()
            .map(|item| Expr::Comparison {
                left: Box::new(left.clone()),
                op: CmpOp::Eq,
                right: Box::new(Expr::Literal(item)),
            })
            .collect();
        let expanded = if alternatives.len() == 1 {
            alternatives.swap_remove(0)
        } else {
            Expr::Or(alternatives)
        };
        Ok(match op {
            CmpOp::NotIn => Expr::Not(Box::new(expanded)),
            _ => expanded,
        })
    }

    /// Substitutes an identifier with its environment value when that value
    /// is a finite sequence or a string. Element bindings and unknown names
    /// stay symbolic.
    fn resolve(&self, expr: Expr) -> Expr {
        if let Expr::Ident(id) = &expr {
            match self.env.get(id.as_str()) {
                Some(Binding::Sequence(items)) => {
                    return Expr::Literal(Literal::Seq(items.clone()));
                }
                Some(Binding::Text(value)) => {
                    return Expr::Literal(Literal::Str(value.clone()));
                }
                Some(Binding::Element) | None => {}
            }
        }
        expr
    }
}

/// Rewrites a universal quantification into its double-negation form: every
/// node satisfies the condition iff no node fails it. The clause predicates
/// fold under a single negation; the yield stays untouched, so a boolean
/// yield lifts afterwards exactly as it would under an existential test.
fn eliminate_universal(comprehension: Comprehension) -> Result<Expr, CompileError> {
    let Comprehension { return_expr, mut clauses } = comprehension;
    let Some(mut clause) = clauses.pop() else {
        return Err(CompileError::unsupported(
            "universal quantification over an empty comprehension",
        ));
    };
    if !clauses.is_empty() {
        return Err(CompileError::unsupported(
            "universal quantification over a multi-clause comprehension",
        ));
    }

    let predicates = mem::take(&mut clause.predicates);
    if !predicates.is_empty() {
        let mut conjuncts = Vec::new();
        for predicate in predicates {
            split_conjunction(predicate, &mut conjuncts);
        }
        let folded = if conjuncts.len() == 1 {
            conjuncts.swap_remove(0)
        } else {
            Expr::And(conjuncts)
        };
        clause.predicates = smallvec![Expr::Not(Box::new(folded))];
    }

    Ok(Expr::Not(Box::new(Expr::Comprehension(Box::new(Comprehension {
        return_expr,
        clauses: vec![clause],
    })))))
}

/// Splits top-level conjunctions so each term can relocate independently.
fn split_conjunction(predicate: Expr, out: &mut Vec<Expr>) {
    match predicate {
        Expr::And(terms) => {
            for term in terms {
                split_conjunction(term, out);
            }
        }
        other => out.push(other),
    }
}

/// Folds a clause's conjuncts back into at most one predicate, flattening
/// any conjunction a relocation carried along whole.
fn refold(conjuncts: Vec<Expr>) -> SmallVec<[Expr; 2]> {
    let mut flat = Vec::new();
    for conjunct in conjuncts {
        split_conjunction(conjunct, &mut flat);
    }
    match flat.len() {
        0 => SmallVec::new(),
        1 => smallvec![flat.swap_remove(0)],
        _ => smallvec![Expr::And(flat)],
    }
}

/// Clause source names in declaration order, outermost first. An attribute
/// source ranks by its root identifier.
fn ranked_source_names(clauses: &[Clause]) -> Vec<Ident> {
    clauses.iter().filter_map(|clause| source_root(&clause.source).cloned()).collect()
}

fn source_root(source: &Expr) -> Option<&Ident> {
    match source {
        Expr::Ident(id) => Some(id),
        Expr::Attribute { base, .. } => source_root(base),
        _ => None,
    }
}

/// The clause a normalized conjunct belongs to: the one binding the
/// outermost-ranked source name the conjunct references, or where it was
/// written when no ranked name is both referenced and bound.
fn destination(conjunct: &Expr, origin: usize, clauses: &[Clause], ranked: &[Ident]) -> usize {
    let mut referenced = Vec::new();
    collect_names(conjunct, &mut referenced);
    for name in ranked {
        if !referenced.iter().any(|found| *found == name.as_str()) {
            continue;
        }
        if let Some(found) = clauses.iter().position(|clause| clause.var == *name) {
            return found;
        }
    }
    origin
}

/// Collects every identifier a predicate references. Attribute accesses
/// contribute their root identifier, not the attribute name; nested
/// comprehensions contribute their bound names, sources, and predicates.
fn collect_names<'e>(expr: &'e Expr, out: &mut Vec<&'e str>) {
    match expr {
        Expr::Ident(id) => out.push(id.as_str()),
        Expr::Attribute { base, .. } => collect_names(base, out),
        Expr::Literal(_) => {}
        Expr::Comparison { left, right, .. } => {
            collect_names(left, out);
            collect_names(right, out);
        }
        Expr::And(terms) | Expr::Or(terms) | Expr::HyphenJoin(terms) => {
            for term in terms {
                collect_names(term, out);
            }
        }
        Expr::Not(inner) => collect_names(inner, out),
        Expr::Call { arg, .. } => collect_names(arg, out),
        Expr::Comprehension(comprehension) => {
            for clause in &comprehension.clauses {
                out.push(clause.var.as_str());
                collect_names(&clause.source, out);
                for predicate in &clause.predicates {
                    collect_names(predicate, out);
                }
            }
            collect_names(&comprehension.return_expr, out);
        }
    }
}
