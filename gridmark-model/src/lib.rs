//! Core data model definitions shared across gridmark crates.
#![allow(missing_docs)]

pub mod asset;
pub mod error;
pub mod player;
pub mod request;
pub mod team;

pub use asset::{AssetKind, AssetVariant, HeadshotSize};
pub use error::{ModelError, Result as ModelResult};
pub use player::{PlayerIdentity, PlayerQuery};
pub use request::{AssetRequest, AssetSubject};
pub use team::{Conference, Division, Region, TeamInfo, TeamKey};
