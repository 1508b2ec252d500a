//! Property test for the query composer (spec §8, invariant 7):
//! `query(W, B)` returns exactly `{ e : alive(e) ∧ ∀T∈W. has<T>(e) ∧ ∀T∈B. ¬has<T>(e) }`,
//! ascending by id.

use proptest::prelude::*;
use sparsecs::Registry;

#[derive(Debug, Clone, Copy, PartialEq)]
struct A(u32);
impl sparsecs::component::Component for A {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct B(u32);
impl sparsecs::component::Component for B {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct C(u32);
impl sparsecs::component::Component for C {}

#[derive(Debug, Clone, Copy)]
enum Setup {
    Spawn { a: bool, b: bool, c: bool },
    Kill(usize),
}

fn setups() -> impl Strategy<Value = Vec<Setup>> {
    prop::collection::vec(
        prop_oneof![
            3 => (any::<bool>(), any::<bool>(), any::<bool>())
                .prop_map(|(a, b, c)| Setup::Spawn { a, b, c }),
            1 => (0usize..32).prop_map(Setup::Kill),
        ],
        0..40,
    )
}

proptest! {
    #[test]
    fn query_matches_brute_force_predicate(setups in setups()) {
        let mut registry = Registry::new();
        let mut entities = Vec::new();

        for setup in setups {
            match setup {
                Setup::Spawn { a, b, c } => {
                    let e = registry.make_entity();
                    if a { registry.bind(e, A(e.raw())).unwrap(); }
                    if b { registry.bind(e, B(e.raw())).unwrap(); }
                    if c { registry.bind(e, C(e.raw())).unwrap(); }
                    entities.push(e);
                }
                Setup::Kill(idx) => {
                    if entities.is_empty() {
                        continue;
                    }
                    registry.kill_entity(entities[idx % entities.len()]);
                }
            }
        }

        // W = {A, B}, B = {C}.
        let expected: Vec<_> = entities
            .iter()
            .copied()
            .filter(|&e| {
                registry.is_alive(e)
                    && registry.has::<A>(e)
                    && registry.has::<B>(e)
                    && !registry.has::<C>(e)
            })
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let actual: Vec<_> = registry
            .query_filtered::<(&A, &B), (C,)>()
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        prop_assert_eq!(actual, expected);
    }
}
