//! Dummy failure categories: `Dummy` with two derived categories, plus an unrelated one.

use failsafe_core::Taxonomy;
use std::sync::Arc;

#[derive(Debug, Default, thiserror::Error)]
#[error("dummy failure")]
pub struct Dummy {
    pub property: Option<String>,
}

impl Dummy {
    pub fn with_property(property: &str) -> Self {
        Self {
            property: Some(property.to_string()),
        }
    }
}

#[derive(Debug, Default, thiserror::Error)]
#[error("dummy failure A")]
pub struct DummyA {
    pub base: Dummy,
}

impl AsRef<Dummy> for DummyA {
    fn as_ref(&self) -> &Dummy {
        &self.base
    }
}

#[derive(Debug, Default, thiserror::Error)]
#[error("dummy failure B")]
pub struct DummyB {
    pub base: Dummy,
}

impl AsRef<Dummy> for DummyB {
    fn as_ref(&self) -> &Dummy {
        &self.base
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrelated failure")]
pub struct Unrelated;

pub fn taxonomy() -> Arc<Taxonomy> {
    let mut t = Taxonomy::new();
    t.root::<Dummy>()
        .and_then(|t| t.derive::<DummyA, Dummy>())
        .and_then(|t| t.derive::<DummyB, Dummy>())
        .and_then(|t| t.root::<Unrelated>())
        .expect("dummy taxonomy");
    Arc::new(t)
}
