//! Typed identifiers for catalog entries.
//!
//! Every definition kind gets its own id type so a building id can never be
//! used to index the resource table. Ids are dense indices assigned in
//! definition order when the [`Catalog`](crate::catalog::Catalog) is built.

use serde::{Deserialize, Serialize};

/// A dense index into one of the catalog tables.
pub trait DenseId: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    /// Kind label used in error messages.
    const KIND: &'static str;

    /// Build an id from a table position.
    fn from_index(index: usize) -> Self;

    /// Table position of this id.
    fn index(self) -> usize;

    /// Raw id value.
    fn raw(self) -> u32;
}

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Create an id from its raw value.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl DenseId for $name {
            const KIND: &'static str = $kind;

            #[allow(clippy::cast_possible_truncation)]
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

dense_id!(
    /// Identifier of a resource definition.
    ResourceId,
    "resource"
);
dense_id!(
    /// Identifier of a building definition.
    BuildingId,
    "building"
);
dense_id!(
    /// Identifier of a manual command definition.
    CommandId,
    "command"
);
dense_id!(
    /// Identifier of a research definition.
    ResearchId,
    "research"
);
dense_id!(
    /// Identifier of a project definition.
    ProjectId,
    "project"
);
dense_id!(
    /// Identifier of a narrative event definition.
    EventId,
    "event"
);
dense_id!(
    /// Identifier of an ideology definition.
    IdeologyId,
    "ideology"
);
dense_id!(
    /// Identifier of a defender definition.
    DefenderId,
    "defender"
);
dense_id!(
    /// Identifier of an adversary definition.
    AdversaryId,
    "adversary"
);

/// Anything an unlock list can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unlockable {
    /// A manual command.
    Command(CommandId),
    /// A building.
    Building(BuildingId),
    /// A resource.
    Resource(ResourceId),
    /// A research item.
    Research(ResearchId),
    /// A project.
    Project(ProjectId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let id = BuildingId::from_index(7);
        assert_eq!(id, BuildingId::new(7));
        assert_eq!(id.index(), 7);
        assert_eq!(id.raw(), 7);
    }

    #[test]
    fn test_display_includes_kind() {
        assert_eq!(ResourceId::new(3).to_string(), "resource#3");
        assert_eq!(<EventId as DenseId>::KIND, "event");
    }
}
