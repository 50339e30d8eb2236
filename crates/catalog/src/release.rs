//! Release: a published version of a package.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{Entity, EntityId};
use depot_engine::schema;

use crate::maintainer::Maintainer;

/// A published version of a package.
///
/// Releases are embedded in their package: they are part of the package's own
/// composition, so dehydration rewrites them in place (stubbing
/// `published_by`) instead of reducing the release itself to a stub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: EntityId,
    pub version: String,
    pub notes: String,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<Maintainer>,
}

impl Entity for Release {
    const KIND: &'static str = "Release";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

schema! {
    Release {
        plain id,
        plain version,
        plain notes,
        plain published_at,
        reference published_by,
    }
}
