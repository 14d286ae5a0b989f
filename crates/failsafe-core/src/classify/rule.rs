//! A single classification rule: category match, then optional payload predicate.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::taxonomy::{probe, Category, Probe, Taxonomy};

type Predicate = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

#[derive(Clone, Copy)]
enum Scope {
    /// Every failure, whatever it holds.
    Any,
    Category {
        id: TypeId,
        probe: Probe,
        include_derived: bool,
    },
}

/// Decides whether one failure is retryable.
///
/// The predicate only ever sees the failure viewed as the rule's own category;
/// it is not called when the category does not match.
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    scope: Scope,
    predicate: Option<Predicate>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("category", &self.name)
            .field("include_derived", &self.includes_derived())
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}

impl Rule {
    /// Match failures whose category is exactly `C`.
    pub fn exact<C: Category>() -> Self {
        Self::new::<C>(false)
    }

    /// Match `C` and every category registered below it in the taxonomy.
    pub fn derived<C: Category>() -> Self {
        Self::new::<C>(true)
    }

    pub fn new<C: Category>(include_derived: bool) -> Self {
        Self {
            name: type_name::<C>(),
            scope: Scope::Category {
                id: TypeId::of::<C>(),
                probe: probe::<C> as Probe,
                include_derived,
            },
            predicate: None,
        }
    }

    /// Like [`Rule::new`], additionally requiring `predicate` to accept the failure.
    pub fn when<C, F>(include_derived: bool, predicate: F) -> Self
    where
        C: Category,
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let mut rule = Self::new::<C>(include_derived);
        rule.predicate = Some(Arc::new(move |view: &dyn Any| {
            view.downcast_ref::<C>().map_or(false, |c| predicate(c))
        }));
        rule
    }

    /// Match any failure at all.
    pub fn any() -> Self {
        Self {
            name: "*",
            scope: Scope::Any,
            predicate: None,
        }
    }

    /// Match any failure the predicate accepts.
    pub fn any_when<F>(predicate: F) -> Self
    where
        F: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        let mut rule = Self::any();
        rule.predicate = Some(Arc::new(move |view: &dyn Any| {
            view.downcast_ref::<anyhow::Error>()
                .map_or(false, |e| predicate(e))
        }));
        rule
    }

    /// Type name of the rule's category (`*` for the universal rule).
    pub fn category(&self) -> &'static str {
        self.name
    }

    pub fn includes_derived(&self) -> bool {
        match self.scope {
            Scope::Any => true,
            Scope::Category {
                include_derived, ..
            } => include_derived,
        }
    }

    /// Category match first (through `taxonomy` for derived rules), then the
    /// predicate, if any, on the failure viewed as the rule's category.
    pub fn matches(&self, failure: &anyhow::Error, taxonomy: &Taxonomy) -> bool {
        let Some(view) = self.view(failure, taxonomy) else {
            return false;
        };
        self.predicate.as_ref().map_or(true, |p| p(view))
    }

    fn view<'a>(&self, failure: &'a anyhow::Error, taxonomy: &Taxonomy) -> Option<&'a dyn Any> {
        match self.scope {
            Scope::Any => Some(failure as &dyn Any),
            Scope::Category {
                id,
                probe,
                include_derived,
            } => probe(failure).or_else(|| {
                if include_derived {
                    taxonomy.view_as(failure, id)
                } else {
                    None
                }
            }),
        }
    }
}
