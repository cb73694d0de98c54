use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::normalizer::CanonicalId;
use crate::entity::{Entity, EntityKind, Literal, Property};
use crate::relationship::RelationType;

/// Stable reference to an entity owned by an [`EntityRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(usize);

impl EntityHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub handle: EntityHandle,
    pub is_new: bool,
}

impl Resolved {
    #[must_use]
    pub const fn new_entity(handle: EntityHandle) -> Self {
        Self {
            handle,
            is_new: true,
        }
    }

    #[must_use]
    pub const fn existing(handle: EntityHandle) -> Self {
        Self {
            handle,
            is_new: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    /// Two different source texts normalized to the same token.
    SourceText,
    /// Two entity kinds derived the same token.
    EntityKind,
}

/// Advisory record of two inputs sharing one canonical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub kind: CollisionKind,
    pub token: String,
    pub existing_kind: EntityKind,
    pub existing_source: String,
    pub incoming_kind: EntityKind,
    pub incoming_source: String,
    /// Token the incoming entity was emitted under when it had to be kind-qualified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_token: Option<String>,
}

#[derive(Debug, Clone)]
struct Claim {
    kind: EntityKind,
    source: Arc<str>,
}

/// Deduplicating store of entities keyed by kind and canonical token.
///
/// Every entity in a build is created through [`EntityRegistry::get_or_create`].
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    index: HashMap<(EntityKind, Arc<str>), EntityHandle>,
    claims: HashMap<Arc<str>, Claim>,
    seen_collisions: HashSet<(Arc<str>, EntityKind, Arc<str>)>,
    collisions: Vec<Collision>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entity for `(kind, id)`, creating it with `build` on first reference.
    ///
    /// `build` runs only for new entities, so later references never overwrite
    /// what the first one wrote. If `build` fails, nothing is stored.
    pub fn get_or_create<F>(
        &mut self,
        kind: EntityKind,
        id: CanonicalId,
        build: F,
    ) -> crate::Result<Resolved>
    where
        F: FnOnce(&mut Entity) -> crate::Result<()>,
    {
        self.check_collision(kind, &id);

        let key = (kind, id.token_arc());
        if let Some(&handle) = self.index.get(&key) {
            return Ok(Resolved::existing(handle));
        }

        // A token already claimed by another kind gets a kind-qualified token so
        // the two entities never share a subject in the output graph.
        let entity_id = match self.claims.get(id.token()) {
            Some(claim) if claim.kind != kind => id.qualified(kind.class_name()),
            _ => id.clone(),
        };
        let mut entity = Entity::new(kind, entity_id);
        build(&mut entity)?;

        let handle = EntityHandle(self.entities.len());
        self.entities.push(entity);
        self.index.insert(key, handle);
        self.claims.entry(id.token_arc()).or_insert_with(|| Claim {
            kind,
            source: Arc::from(id.source()),
        });

        tracing::trace!(%kind, token = id.token(), "Created entity");
        Ok(Resolved::new_entity(handle))
    }

    fn check_collision(&mut self, kind: EntityKind, id: &CanonicalId) {
        let Some(claim) = self.claims.get(id.token()) else {
            return;
        };

        let collision_kind = if claim.kind != kind {
            CollisionKind::EntityKind
        } else if &*claim.source != id.source() {
            CollisionKind::SourceText
        } else {
            return;
        };

        let marker = (id.token_arc(), kind, Arc::from(id.source()));
        if !self.seen_collisions.insert(marker) {
            return;
        }

        let collision = Collision {
            kind: collision_kind,
            token: id.token().to_string(),
            existing_kind: claim.kind,
            existing_source: claim.source.to_string(),
            incoming_kind: kind,
            incoming_source: id.source().to_string(),
            qualified_token: (collision_kind == CollisionKind::EntityKind)
                .then(|| id.qualified(kind.class_name()).token().to_string()),
        };
        tracing::warn!(
            token = %collision.token,
            existing = %collision.existing_source,
            incoming = %collision.incoming_source,
            "Identifier collision: distinct inputs share one canonical id"
        );
        self.collisions.push(collision);
    }

    /// First-write-wins property assignment. Returns whether the value was stored.
    pub fn set_property(
        &mut self,
        handle: EntityHandle,
        property: Property,
        value: Literal,
    ) -> crate::Result<bool> {
        self.entities[handle.0].set_property(property, value)
    }

    /// Adds an edge unless it already exists or, for functional relations,
    /// the subject already has an object. Returns whether the edge was added.
    pub fn relate(
        &mut self,
        subject: EntityHandle,
        relation: RelationType,
        object: EntityHandle,
    ) -> crate::Result<bool> {
        if subject == object {
            return Err(crate::Error::SelfReference);
        }

        let subject_kind = self.entities[subject.0].kind();
        let object_kind = self.entities[object.0].kind();
        if !relation.accepts(subject_kind, object_kind) {
            return Err(crate::Error::InvalidRelation {
                relation,
                subject: subject_kind,
                object: object_kind,
            });
        }

        let blocked = {
            let mut existing = self.entities[subject.0].related(relation);
            if relation.is_functional() {
                existing.next().is_some()
            } else {
                existing.any(|h| h == object)
            }
        };
        if blocked {
            return Ok(false);
        }

        self.entities[subject.0].push_relation(relation, object);
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> &Entity {
        &self.entities[handle.0]
    }

    #[must_use]
    pub fn find(&self, kind: EntityKind, token: &str) -> Option<EntityHandle> {
        self.index.get(&(kind, Arc::from(token))).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityHandle(i), e))
    }

    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}
