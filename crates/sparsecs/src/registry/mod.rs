//! The type-heterogeneous registry (spec §4.D): owns the entity allocator
//! plus one [`SparseSet`] per component type ever bound, erased behind
//! [`ComponentStorage`] so a killed entity can be purged from every store
//! without the registry knowing any of their concrete types.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

pub mod bundle;

use crate::{
    component::{Component, ComponentStorage, sparse_set::SparseSet},
    entity::{EntityAllocator, EntityId},
    error::BindError,
    query::{ExcludeParam, GetAll, QueryParam},
    registry::bundle::ComponentBundle,
};

/// Owns the entity allocator and a `TypeId`-keyed map of erased component
/// stores. This is the single exclusive resource described in spec §5: any
/// mutating operation takes `&mut Registry`, any read-only one takes
/// `&Registry`, and the borrow checker enforces the rest.
#[derive(Default)]
pub struct Registry {
    allocator: EntityAllocator,
    components: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl Registry {
    /// Creates a new, empty registry with no entities and no component
    /// stores installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity, recycling the most recently killed id
    /// first. Panics only on total id-space exhaustion (see
    /// [`EntityAllocator::create_entity`]).
    pub fn make_entity(&mut self) -> EntityId {
        self.allocator.create_entity()
    }

    /// True iff `entity` was created and has not since been killed.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Kills `entity`, purging its components from every registered store.
    /// No-op if `entity` is not currently alive. Store iteration order is
    /// the map's natural order: unspecified but deterministic within one
    /// process run.
    pub fn kill_entity(&mut self, entity: EntityId) {
        if !self.allocator.kill_entity(entity) {
            return;
        }
        for storage in self.components.values_mut() {
            storage.purge(entity);
        }
    }

    /// True iff `entity` has a component of type `C`. False if no store for
    /// `C` has ever been created.
    pub fn has<C: Component + 'static>(&self, entity: EntityId) -> bool {
        self.store::<C>().is_some_and(|s| s.has(entity))
    }

    /// Borrows `entity`'s `C` component, if bound. The reference is
    /// invalidated by the next `bind`/`unbind`/`kill_entity` call that
    /// touches the `C` store.
    pub fn get<C: Component + 'static>(&self, entity: EntityId) -> Option<&C> {
        self.store::<C>().and_then(|s| s.get(entity))
    }

    /// Mutably borrows `entity`'s `C` component, if bound.
    pub fn get_mut<C: Component + 'static>(&mut self, entity: EntityId) -> Option<&mut C> {
        self.store_mut::<C>().and_then(|s| s.get_mut(entity))
    }

    /// Binds `value` as entity `entity`'s `C` component, lazily creating the
    /// `C` store on its first use.
    ///
    /// Fails with [`BindError::DeadEntity`] if `entity` is not alive.
    /// `BindError::InvalidKey` is part of the same enum (and still reachable
    /// by calling [`crate::component::sparse_set::SparseSet::bind`]
    /// directly) but never surfaces through this method: the null id is
    /// never alive, so it is always rejected as `DeadEntity` before the
    /// store is ever consulted. Neither failure mutates any state: liveness
    /// is checked before the store is touched.
    pub fn bind<C: Component + 'static>(
        &mut self,
        entity: EntityId,
        value: C,
    ) -> Result<(), BindError> {
        if !self.is_alive(entity) {
            return Err(BindError::DeadEntity(entity));
        }

        let type_id = TypeId::of::<C>();
        let storage = self.components.entry(type_id).or_insert_with(|| {
            log::trace!(
                "lazily creating component store for {}",
                std::any::type_name::<C>()
            );
            Box::new(SparseSet::<C>::new())
        });

        let set = (storage.as_mut() as &mut dyn Any)
            .downcast_mut::<SparseSet<C>>()
            .expect("store registered under TypeId::of::<C>() is always a SparseSet<C>");
        set.bind(entity, value)
    }

    /// Removes and returns `entity`'s `C` component, if bound. Succeeds
    /// independently of entity liveness: a just-killed entity simply has no
    /// components left to return.
    pub fn unbind<C: Component + 'static>(&mut self, entity: EntityId) -> Option<C> {
        self.store_mut::<C>().and_then(|s| s.unbind(entity))
    }

    /// All live entity ids currently bound to a `C` component, in ascending
    /// order. Empty if no `C` store has ever been created.
    pub fn entities_with<C: Component + 'static>(&self) -> Vec<EntityId> {
        match self.store::<C>() {
            Some(store) => {
                let mut ids: Vec<EntityId> = store.dense_entities().to_vec();
                ids.sort_unstable();
                ids
            }
            None => Vec::new(),
        }
    }

    /// Componentwise `get::<Ti>(entity)` over a fixed-arity type list `T`,
    /// e.g. `registry.get_all::<(Position, Velocity)>(e)`.
    pub fn get_all<'q, T: GetAll<'q>>(&'q self, entity: EntityId) -> T::Item {
        T::get_all(self, entity)
    }

    /// The query composer (spec §4.E) with no exclusions: every entity
    /// bearing all of `Q`'s component types, ascending by id, paired with
    /// read-only references to each.
    pub fn query<'q, Q: QueryParam<'q>>(&'q mut self) -> Vec<(EntityId, Q::Item)> {
        self.query_filtered::<Q, ()>()
    }

    /// The full query composer: must-have set `Q`, must-not-have set `X`.
    /// Results are ascending by id; see spec §4.E for the set algebra.
    pub fn query_filtered<'q, Q: QueryParam<'q>, X: ExcludeParam>(
        &'q mut self,
    ) -> Vec<(EntityId, Q::Item)> {
        let candidates = Q::matching_ids(self);
        let ids: Vec<EntityId> = {
            let registry: &Registry = self;
            candidates
                .into_iter()
                .filter(|&id| !X::any_present(registry, id))
                .collect()
        };

        // Resolve every must-have type's store exactly once, then fetch
        // each row from the raw pointers; see `QueryParam`'s doc comment
        // for why fetching can't reborrow `self` per row.
        let stores = Q::store_ptrs(self);
        ids.into_iter()
            .map(|id| {
                // SAFETY: `id` came from `Q::matching_ids` against this same
                // registry, with no intervening mutation since `stores` was
                // resolved.
                let item = unsafe { Q::fetch(&stores, id) };
                (id, item)
            })
            .collect()
    }

    /// Creates a new entity and binds every component of `bundle` to it, in
    /// order. Sugar over `make_entity` plus repeated `bind`; the bundle is
    /// always bound onto a freshly created, live entity, so a `bind` failure
    /// here is a library bug, not a user error.
    pub fn spawn<B: ComponentBundle>(&mut self, bundle: B) -> EntityId {
        let entity = self.make_entity();
        bundle
            .bind_to_entity(self, entity)
            .expect("bundle bind onto a freshly created entity cannot fail");
        entity
    }

    fn store<C: Component + 'static>(&self) -> Option<&SparseSet<C>> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|s| (s.as_ref() as &dyn Any).downcast_ref())
    }

    fn store_mut<C: Component + 'static>(&mut self) -> Option<&mut SparseSet<C>> {
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|s| (s.as_mut() as &mut dyn Any).downcast_mut())
    }

    /// Raw pointer to the `C` store, for use by the query fetch machinery
    /// (`crate::query`), which needs to borrow several stores at once under
    /// one outer `&mut Registry`. Panics if no `C` store exists; callers
    /// only reach this after `matching_ids` has already confirmed the store
    /// is populated for every must-have type.
    pub(crate) fn store_ptr<C: Component + 'static>(&mut self) -> *mut SparseSet<C> {
        self.store_mut::<C>()
            .expect("component store missing during query fetch; this is a bug") as *mut SparseSet<C>
    }
}
