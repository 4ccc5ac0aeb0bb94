use crate::ecs::component::ComponentKind;
use crate::ecs::entity::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcsError {
    #[error("entity capacity exhausted ({capacity} slots)")]
    CapacityExhausted { capacity: usize },

    #[error("invalid entity {0}")]
    InvalidEntity(EntityId),

    #[error("entity {entity} has no {kind:?} component")]
    MissingComponent {
        entity: EntityId,
        kind: ComponentKind,
    },

    #[error("domain error: {0}")]
    Domain(String),

    #[error("numeric instability on entity {0}")]
    NumericInstability(EntityId),
}

pub type Result<T> = std::result::Result<T, EcsError>;
