//! Explicit category hierarchy for failure types.
//!
//! Rust error types have no subclassing, so "derived" failures are declared
//! here. A child category embeds its parent and exposes it through `AsRef`,
//! which lets a rule written for the parent inspect a child failure as the
//! parent type.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::error::TaxonomyError;

/// Anything `anyhow` can downcast to: the bound every failure category satisfies.
pub trait Category: fmt::Display + fmt::Debug + Send + Sync + 'static {}

impl<T> Category for T where T: fmt::Display + fmt::Debug + Send + Sync + 'static {}

/// Recovers a failure as one concrete category, if that is what it holds.
pub(crate) type Probe = for<'a> fn(&'a anyhow::Error) -> Option<&'a dyn Any>;

/// Views a child category value as its direct parent.
type Upcast = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

pub(crate) fn probe<C: Category>(failure: &anyhow::Error) -> Option<&dyn Any> {
    failure.downcast_ref::<C>().map(|c| c as &dyn Any)
}

fn upcast<D, P>(value: &dyn Any) -> Option<&dyn Any>
where
    D: AsRef<P> + 'static,
    P: 'static,
{
    value
        .downcast_ref::<D>()
        .map(|d| <D as AsRef<P>>::as_ref(d) as &dyn Any)
}

struct Node {
    name: &'static str,
    probe: Probe,
    parent: Option<(TypeId, Upcast)>,
}

/// Registry of failure categories and their parent links.
///
/// A category can only be attached to a parent that is already registered and
/// can only be registered once, so the hierarchy is always a forest.
#[derive(Default)]
pub struct Taxonomy {
    nodes: HashMap<TypeId, Node>,
}

impl fmt::Debug for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.nodes.values().map(|n| n.name).collect();
        names.sort_unstable();
        f.debug_struct("Taxonomy").field("categories", &names).finish()
    }
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` as a top-level category.
    pub fn root<C: Category>(&mut self) -> Result<&mut Self, TaxonomyError> {
        self.insert::<C>(None)?;
        Ok(self)
    }

    /// Register `D` as a direct child of the already-registered category `P`.
    pub fn derive<D, P>(&mut self) -> Result<&mut Self, TaxonomyError>
    where
        D: Category + AsRef<P>,
        P: Category,
    {
        if !self.contains::<P>() {
            return Err(TaxonomyError::UnknownParent {
                child: type_name::<D>(),
                parent: type_name::<P>(),
            });
        }
        self.insert::<D>(Some((TypeId::of::<P>(), upcast::<D, P> as Upcast)))?;
        Ok(self)
    }

    fn insert<C: Category>(&mut self, parent: Option<(TypeId, Upcast)>) -> Result<(), TaxonomyError> {
        let id = TypeId::of::<C>();
        if self.nodes.contains_key(&id) {
            return Err(TaxonomyError::AlreadyRegistered(type_name::<C>()));
        }
        self.nodes.insert(
            id,
            Node {
                name: type_name::<C>(),
                probe: probe::<C> as Probe,
                parent,
            },
        );
        Ok(())
    }

    /// True iff `C` has been registered, as a root or a child.
    pub fn contains<C: 'static>(&self) -> bool {
        self.nodes.contains_key(&TypeId::of::<C>())
    }

    /// Number of registered categories.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True iff `A` is a proper ancestor of `D`. A category is not its own descendant.
    pub fn is_descendant<D: 'static, A: 'static>(&self) -> bool {
        self.is_descendant_id(TypeId::of::<D>(), TypeId::of::<A>())
    }

    pub(crate) fn is_descendant_id(&self, child: TypeId, ancestor: TypeId) -> bool {
        let mut current = child;
        while let Some((parent, _)) = self.nodes.get(&current).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Name of the registered category the failure holds, if any.
    pub fn category_of(&self, failure: &anyhow::Error) -> Option<&'static str> {
        self.nodes
            .values()
            .find(|n| (n.probe)(failure).is_some())
            .map(|n| n.name)
    }

    /// View `failure` as the category `target` when its runtime category is a
    /// registered descendant of `target`. Exact matches are the caller's job.
    pub(crate) fn view_as<'a>(
        &self,
        failure: &'a anyhow::Error,
        target: TypeId,
    ) -> Option<&'a dyn Any> {
        self.nodes
            .iter()
            .filter(|(id, _)| self.is_descendant_id(**id, target))
            .find_map(|(id, node)| {
                (node.probe)(failure).and_then(|value| self.upcast_to(*id, value, target))
            })
    }

    fn upcast_to<'a>(
        &self,
        mut current: TypeId,
        mut value: &'a dyn Any,
        target: TypeId,
    ) -> Option<&'a dyn Any> {
        while current != target {
            let (parent, upcast) = self.nodes.get(&current)?.parent?;
            value = upcast(value)?;
            current = parent;
        }
        Some(value)
    }
}
