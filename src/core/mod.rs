//! Core game types and entities

pub mod card;
pub mod effects;
pub mod entity;
pub mod player;
pub mod types;

pub use card::{
    Attribute, CardCategory, CardDefinition, CardInstance, InstanceId, MonsterKind, MonsterStats,
    PlayerId, Position, Race, SpellKind, SummonKind, TrapKind,
};
pub use effects::{
    BodyFn, CardEffects, ConditionFn, CostFn, EffectHandler, EffectHook, Resolve, ResolveProbe,
    ResolveState,
};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::Player;
pub use types::{CardName, EffectKey, PlayerName};
