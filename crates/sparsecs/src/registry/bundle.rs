use crate::{component::Component, entity::EntityId, error::BindError, registry::Registry};

/// A fixed-arity group of components that can be bound to an entity in one
/// call. Implemented for tuples of components up to 32 elements, and for any
/// single `Component` by itself.
pub trait ComponentBundle {
    /// Binds every component in the bundle to `entity`, in order.
    fn bind_to_entity(self, registry: &mut Registry, entity: EntityId) -> Result<(), BindError>;
}

impl<C: Component + 'static> ComponentBundle for C {
    fn bind_to_entity(self, registry: &mut Registry, entity: EntityId) -> Result<(), BindError> {
        registry.bind(entity, self)
    }
}

macro_rules! impl_bundle_for_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> ComponentBundle for ($($name,)+)
        where
            $($name: Component + 'static),+
        {
            #[allow(non_snake_case)]
            fn bind_to_entity(self, registry: &mut Registry, entity: EntityId) -> Result<(), BindError> {
                let ($($name,)+) = self;
                $(
                    registry.bind(entity, $name)?;
                )+
                Ok(())
            }
        }
    };
}

impl_bundle_for_tuple!(C0);
impl_bundle_for_tuple!(C0, C1);
impl_bundle_for_tuple!(C0, C1, C2);
impl_bundle_for_tuple!(C0, C1, C2, C3);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26, C27
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26, C27, C28
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26, C27, C28, C29
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26, C27, C28, C29, C30
);
impl_bundle_for_tuple!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18, C19, C20,
    C21, C22, C23, C24, C25, C26, C27, C28, C29, C30, C31
);
