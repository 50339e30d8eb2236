//! Maintainer: a person or team publishing packages.

use serde::{Deserialize, Serialize};

use depot_core::{Entity, EntityId};
use depot_engine::schema;

/// A person or team that publishes and maintains packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

impl Entity for Maintainer {
    const KIND: &'static str = "Maintainer";

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
    Maintainer {
        plain id,
        plain name,
        plain email,
    }
}
