use std::fmt;

/// The integer type backing [`EntityId`].
///
/// `u32` by default; enable the `entity-id-u64` feature to widen it.
#[cfg(not(feature = "entity-id-u64"))]
pub type RawId = u32;

/// The integer type backing [`EntityId`].
#[cfg(feature = "entity-id-u64")]
pub type RawId = u64;

/// The reserved sentinel value: never identifies a live entity, and marks
/// the end of the allocator's free chain.
pub const NULL_ID: RawId = RawId::MAX;

/// A lightweight integer identifier naming an entity.
///
/// `EntityId` carries no generation counter. Once an id is recycled it
/// refers to whatever was most recently spawned into that slot; liveness
/// is tracked by the [`EntityAllocator`], not encoded in the id itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(RawId);

impl EntityId {
    /// The reserved sentinel id. No call ever returns this as a live entity.
    pub const NULL: EntityId = EntityId(NULL_ID);

    /// Wraps a raw integer as an id, without consulting any allocator.
    ///
    /// Mainly useful for tests and for embedding code that drives a
    /// [`crate::component::sparse_set::SparseSet`] directly rather than
    /// through a [`crate::registry::Registry`]; ids minted this way carry no
    /// liveness guarantee of their own.
    pub fn new(raw: RawId) -> Self {
        Self(raw)
    }

    /// The raw integer backing this id.
    pub fn raw(self) -> RawId {
        self.0
    }

    /// True for [`EntityId::NULL`], false for every other id.
    pub fn is_null(self) -> bool {
        self.0 == NULL_ID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity ids and recycles killed ones through an implicit
/// free-list.
///
/// `entities[e] == e` marks slot `e` alive. A dead slot instead stores the
/// index of the next dead slot (or [`NULL_ID`] if it is the last one freed),
/// so liveness bit and free-list pointer share a single word per entity.
#[derive(Debug)]
pub struct EntityAllocator {
    entities: Vec<RawId>,
    head: RawId,
}

impl Default for EntityAllocator {
    /// An empty allocator. Note this is *not* the all-zero bit pattern: an
    /// empty free-list is encoded as `head == NULL_ID`, so this cannot be a
    /// derived `#[derive(Default)]` impl without corrupting `create_entity`'s
    /// free-list check on the very first call.
    fn default() -> Self {
        Self::new()
    }
}

impl EntityAllocator {
    /// Creates a new, empty allocator.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            head: NULL_ID,
        }
    }

    /// Allocates a fresh entity, reusing the most recently killed id first.
    ///
    /// Panics if the id space is exhausted (`len(entities)` would reach
    /// [`NULL_ID`]); this can only happen after `NULL_ID - 1` entities have
    /// been created without ever being recycled.
    pub fn create_entity(&mut self) -> EntityId {
        if self.head == NULL_ID {
            let next = self.entities.len() as RawId;
            if next == NULL_ID {
                log::warn!("entity id space exhausted at {next} live slots");
                panic!("entity id space exhausted");
            }
            self.entities.push(next);
            EntityId(next)
        } else {
            let id = self.head;
            self.head = self.entities[id as usize];
            self.entities[id as usize] = id;
            EntityId(id)
        }
    }

    /// True iff `id` was created and has not since been killed.
    pub fn is_alive(&self, id: EntityId) -> bool {
        let raw = id.0;
        raw != NULL_ID && (raw as usize) < self.entities.len() && self.entities[raw as usize] == raw
    }

    /// Kills `id`, pushing it onto the free-list head. No-op if already dead
    /// or never allocated. Returns whether the entity was alive beforehand.
    pub fn kill_entity(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let raw = id.0;
        self.entities[raw as usize] = self.head;
        self.head = raw;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entities_are_sequential() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.create_entity();
        let e1 = alloc.create_entity();
        let e2 = alloc.create_entity();

        assert_eq!(e0.raw(), 0);
        assert_eq!(e1.raw(), 1);
        assert_eq!(e2.raw(), 2);
        assert!(alloc.is_alive(e0) && alloc.is_alive(e1) && alloc.is_alive(e2));
    }

    #[test]
    fn default_allocator_starts_entities_sequential() {
        // `Default::default()` must not corrupt `head`: an all-zero bit
        // pattern for `head` would misread as "slot 0 is free" instead of
        // "the free-list is empty".
        let mut alloc = EntityAllocator::default();
        let e0 = alloc.create_entity();
        let e1 = alloc.create_entity();
        assert_eq!(e0.raw(), 0);
        assert_eq!(e1.raw(), 1);
        assert!(alloc.is_alive(e0) && alloc.is_alive(e1));
    }

    #[test]
    fn kill_marks_dead_and_is_idempotent() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.create_entity();

        assert!(alloc.kill_entity(e0));
        assert!(!alloc.is_alive(e0));
        assert!(!alloc.kill_entity(e0), "second kill is a no-op, not an error");
    }

    #[test]
    fn recycling_is_lifo() {
        // S3: spawn 0,1,2,3; kill 2,0,1,3; next four spawns return 3,1,0,2.
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.create_entity();
        let e1 = alloc.create_entity();
        let e2 = alloc.create_entity();
        let e3 = alloc.create_entity();

        alloc.kill_entity(e2);
        alloc.kill_entity(e0);
        alloc.kill_entity(e1);
        alloc.kill_entity(e3);

        assert_eq!(alloc.create_entity(), e3);
        assert_eq!(alloc.create_entity(), e1);
        assert_eq!(alloc.create_entity(), e0);
        assert_eq!(alloc.create_entity(), e2);

        // Free-list is now empty; the next id is fresh and ascending.
        let fresh = alloc.create_entity();
        assert_eq!(fresh.raw(), 4);
    }

    #[test]
    fn unknown_id_is_not_alive() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(EntityId::new(0)));
        assert!(!alloc.is_alive(EntityId::NULL));
    }

    #[test]
    fn revived_id_has_no_stale_links() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.create_entity();
        let e1 = alloc.create_entity();

        alloc.kill_entity(e0);
        alloc.kill_entity(e1);

        // e1 is recycled first (LIFO), then e0; both come back alive.
        let r1 = alloc.create_entity();
        let r0 = alloc.create_entity();
        assert_eq!(r1, e1);
        assert_eq!(r0, e0);
        assert!(alloc.is_alive(r0) && alloc.is_alive(r1));
    }
}
