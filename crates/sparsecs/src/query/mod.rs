//! The query composer (spec §4.E): given a must-have set of component types
//! and an optional must-not-have set, returns every matching entity in
//! ascending id order paired with read-only references to its must-have
//! components.
//!
//! The must-have/must-not-have *sets* are expressed as Rust tuple types,
//! `(&Position, &Velocity)` for a two-component must-have set, because the
//! corpus favors compile-time tuple machinery over a runtime list of type
//! keys for this kind of variadic API. [`QueryParam`] and [`ExcludeParam`]
//! are implemented once per tuple arity by the macros below; the semantic
//! contract is only the shape of the returned tuple, not how it is produced.

use std::cmp::Ordering;

use crate::{component::Component, component::sparse_set::SparseSet, entity::EntityId, registry::Registry};

/// One projected field of a query result: a read-only reference to a single
/// must-have component type.
pub trait QueryItem<'q> {
    /// The concrete component type this field borrows from.
    type Component: Component + 'static;
    /// What gets produced for this field, always `&'q Self::Component`.
    type Item;

    /// # Safety
    /// `store` must point to a live `SparseSet<Self::Component>` that
    /// outlives `'q`, and `id` must satisfy `store.has(id)`. [`QueryParam`]
    /// impls uphold both by construction: `id` only ever comes from
    /// [`QueryParam::matching_ids`], which intersects `entities_with` lists
    /// for exactly these component types.
    unsafe fn fetch(store: *mut SparseSet<Self::Component>, id: EntityId) -> Self::Item;
}

impl<'q, C: Component + 'static> QueryItem<'q> for &'q C {
    type Component = C;
    type Item = &'q C;

    unsafe fn fetch(store: *mut SparseSet<C>, id: EntityId) -> Self::Item {
        // SAFETY: forwarded from the caller's obligations on `fetch`.
        unsafe {
            let value = (*store).get(id);
            debug_assert!(
                value.is_some(),
                "must-have component missing during query fetch; this is a bug"
            );
            value.unwrap_unchecked()
        }
    }
}

/// A must-have set `W` of component types, realized as a tuple of
/// `&Component` fields.
///
/// Fetching is two-phase, mirroring the teacher's own query iterator: once
/// per `query` call, [`Self::store_ptrs`] resolves a raw pointer to each
/// must-have type's store (a single reborrow of the registry), then
/// [`Self::fetch`] dereferences those pointers once per matching id without
/// needing to borrow the registry again. Splitting it this way is what lets
/// one `&mut Registry` serve every row of the result set: a naive
/// `fn fetch(&'q mut Registry, EntityId) -> Item` could only ever be called
/// once for a given `'q`.
pub trait QueryParam<'q> {
    /// The tuple of component references produced per matching entity.
    type Item;
    /// Tuple of raw store pointers, one per must-have component type.
    type Stores;

    /// Entities having every component type in this set, intersected across
    /// the per-type `entities_with` lists. Ascending, since each input list
    /// is ascending and intersection of sorted sequences preserves order.
    fn matching_ids(registry: &Registry) -> Vec<EntityId>;

    /// Resolves each must-have type's store once, up front.
    fn store_ptrs(registry: &'q mut Registry) -> Self::Stores;

    /// # Safety
    /// `id` must be one returned by [`Self::matching_ids`] against the same
    /// registry `stores` was resolved from, with no intervening mutation.
    unsafe fn fetch(stores: &Self::Stores, id: EntityId) -> Self::Item;
}

/// The empty must-have set. Per spec: a query with no positive constraints
/// expresses no projection and always yields an empty sequence, even though
/// every entity vacuously "has all zero components".
impl<'q> QueryParam<'q> for () {
    type Item = ();
    type Stores = ();

    fn matching_ids(_registry: &Registry) -> Vec<EntityId> {
        Vec::new()
    }

    fn store_ptrs(_registry: &'q mut Registry) -> Self::Stores {}

    unsafe fn fetch(_stores: &Self::Stores, _id: EntityId) {}
}

/// A must-not-have set `B` of component types.
pub trait ExcludeParam {
    /// True iff `id` carries any component type in this set.
    fn any_present(registry: &Registry, id: EntityId) -> bool;
}

/// The empty must-not-have set: nothing is ever excluded.
impl ExcludeParam for () {
    fn any_present(_registry: &Registry, _id: EntityId) -> bool {
        false
    }
}

/// Merges two ascending, duplicate-free id sequences into their
/// intersection, also ascending.
fn intersect_sorted(a: &[EntityId], b: &[EntityId]) -> Vec<EntityId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

macro_rules! impl_query_param_for_tuple {
    ($($name:ident),+) => {
        impl<'q, $($name: QueryItem<'q>),+> QueryParam<'q> for ($($name,)+) {
            type Item = ($($name::Item,)+);
            type Stores = ($(*mut SparseSet<$name::Component>,)+);

            fn matching_ids(registry: &Registry) -> Vec<EntityId> {
                let mut lists: Vec<Vec<EntityId>> =
                    vec![$(registry.entities_with::<$name::Component>()),+];
                // Intersecting the shortest list first keeps the running
                // accumulator small for the rest of the merges.
                lists.sort_by_key(|l| l.len());
                let mut iter = lists.into_iter();
                let mut acc = iter.next().expect("at least one component type in a non-empty tuple");
                for list in iter {
                    acc = intersect_sorted(&acc, &list);
                }
                acc
            }

            fn store_ptrs(registry: &'q mut Registry) -> Self::Stores {
                ($(registry.store_ptr::<$name::Component>(),)+)
            }

            #[allow(non_snake_case)]
            unsafe fn fetch(stores: &Self::Stores, id: EntityId) -> Self::Item {
                let ($($name,)+) = *stores;
                unsafe {
                    ($(
                        $name::fetch($name, id),
                    )+)
                }
            }
        }
    };
}

macro_rules! impl_exclude_param_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component + 'static),+> ExcludeParam for ($($name,)+) {
            fn any_present(registry: &Registry, id: EntityId) -> bool {
                $(registry.has::<$name>(id))||+
            }
        }
    };
}

/// Componentwise `get<Ti>(e)` over a fixed-arity type list, producing a
/// tuple of present-or-absent references (spec §4.D `get_all`).
pub trait GetAll<'q> {
    /// Tuple of `Option<&Ti>`, one per requested type, in request order.
    type Item;

    fn get_all(registry: &'q Registry, entity: EntityId) -> Self::Item;
}

macro_rules! impl_get_all_for_tuple {
    ($($name:ident),+) => {
        impl<'q, $($name: Component + 'static),+> GetAll<'q> for ($($name,)+) {
            type Item = ($(Option<&'q $name>,)+);

            #[allow(non_snake_case)]
            fn get_all(registry: &'q Registry, entity: EntityId) -> Self::Item {
                ($(registry.get::<$name>(entity),)+)
            }
        }
    };
}

impl_query_param_for_tuple!(Q0);
impl_query_param_for_tuple!(Q0, Q1);
impl_query_param_for_tuple!(Q0, Q1, Q2);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6, Q7);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6, Q7, Q8);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6, Q7, Q8, Q9);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6, Q7, Q8, Q9, Q10);
impl_query_param_for_tuple!(Q0, Q1, Q2, Q3, Q4, Q5, Q6, Q7, Q8, Q9, Q10, Q11);

impl_exclude_param_for_tuple!(B0);
impl_exclude_param_for_tuple!(B0, B1);
impl_exclude_param_for_tuple!(B0, B1, B2);
impl_exclude_param_for_tuple!(B0, B1, B2, B3);
impl_exclude_param_for_tuple!(B0, B1, B2, B3, B4);
impl_exclude_param_for_tuple!(B0, B1, B2, B3, B4, B5);
impl_exclude_param_for_tuple!(B0, B1, B2, B3, B4, B5, B6);
impl_exclude_param_for_tuple!(B0, B1, B2, B3, B4, B5, B6, B7);

impl_get_all_for_tuple!(T0);
impl_get_all_for_tuple!(T0, T1);
impl_get_all_for_tuple!(T0, T1, T2);
impl_get_all_for_tuple!(T0, T1, T2, T3);
impl_get_all_for_tuple!(T0, T1, T2, T3, T4);
impl_get_all_for_tuple!(T0, T1, T2, T3, T4, T5);
impl_get_all_for_tuple!(T0, T1, T2, T3, T4, T5, T6);
impl_get_all_for_tuple!(T0, T1, T2, T3, T4, T5, T6, T7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct U32C(u32);
    impl Component for U32C {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Vec2(i32, i32);
    impl Component for Vec2 {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Char(char);
    impl Component for Char {}

    #[test]
    fn empty_must_have_yields_empty_sequence() {
        let mut registry = Registry::new();
        let e = registry.make_entity();
        registry.bind(e, U32C(1)).unwrap();

        let results: Vec<(EntityId, ())> = registry.query::<()>();
        assert!(results.is_empty());
    }

    #[test]
    fn query_with_exclusion() {
        // S6
        let mut registry = Registry::new();
        let e0 = registry.make_entity();
        let e1 = registry.make_entity();
        registry.bind(e0, U32C(0)).unwrap();
        registry.bind(e0, Vec2(0, 0)).unwrap();
        registry.bind(e0, Char('x')).unwrap();
        registry.bind(e1, U32C(1)).unwrap();
        registry.bind(e1, Vec2(1, 1)).unwrap();

        let all: Vec<(EntityId, (&U32C, &Vec2))> = registry.query::<(&U32C, &Vec2)>();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, e0);
        assert_eq!(all[1].0, e1);

        let filtered: Vec<(EntityId, (&U32C, &Vec2))> =
            registry.query_filtered::<(&U32C, &Vec2), (Char,)>();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0, e1);
    }

    #[test]
    fn get_all_is_componentwise() {
        // S5
        let mut registry = Registry::new();
        let e0 = registry.make_entity();
        let e1 = registry.make_entity();
        registry.bind(e0, Vec2(0, 2)).unwrap();
        registry.bind(e0, U32C(0)).unwrap();
        registry.bind(e1, Vec2(1, 3)).unwrap();
        registry.bind(e1, U32C(1)).unwrap();

        let (u, v) = registry.get_all::<(U32C, Vec2)>(e1);
        assert_eq!(u, Some(&U32C(1)));
        assert_eq!(v, Some(&Vec2(1, 3)));
    }

    #[test]
    fn query_results_are_ascending_by_id() {
        let mut registry = Registry::new();
        let ids: Vec<EntityId> = (0..8).map(|_| registry.make_entity()).collect();
        for &id in ids.iter().rev() {
            registry.bind(id, U32C(id.raw())).unwrap();
        }

        let results: Vec<(EntityId, (&U32C,))> = registry.query::<(&U32C,)>();
        let found: Vec<EntityId> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(found, ids);
    }
}
