//! Package: the catalog's root entity.

use serde::{Deserialize, Serialize};

use depot_core::{Entity, EntityId};
use depot_engine::schema;

use crate::maintainer::Maintainer;
use crate::release::Release;

/// A package in the catalog.
///
/// `dependencies` is a self-referential reference collection: other packages
/// related by identity only. `releases` are embedded compositions owned by
/// the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub maintainer: Option<Maintainer>,
    pub dependencies: Vec<Package>,
    pub releases: Vec<Release>,
}

impl Entity for Package {
    const KIND: &'static str = "Package";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn display_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_display_name(&mut self, name: String) {
        self.name = name;
    }
}

schema! {
    Package {
        plain id,
        plain name,
        plain description,
        reference maintainer,
        references dependencies,
        embeds releases,
    }
}
