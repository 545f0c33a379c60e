mod gate;
mod keys;
mod loader;

pub use gate::{AssetGate, GateState, GateTransition};
pub use keys::{actor_asset_key, ActorSprite, AssetKey, AssetPathError};
pub use loader::{
    load_asset, load_sprite, spawn_asset_loads, AssetCompletion, AssetLoadError, AssetTable,
    Sprite,
};
