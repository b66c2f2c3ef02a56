use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{Result, WeatherError},
    model::Coordinates,
};

/// Source of the caller's position, standing in for the device OS.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    /// Ask for permission to read the position. `false` means denied.
    async fn request_permission(&self) -> bool;

    /// One-shot position read.
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Resolver backed by coordinates known up front (config file or flags).
/// Permission is granted only when coordinates are present.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

impl FixedLocation {
    pub fn at(coords: Coordinates) -> Self {
        Self(Some(coords))
    }

    pub fn denied() -> Self {
        Self(None)
    }
}

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn request_permission(&self) -> bool {
        self.0.is_some()
    }

    async fn current_position(&self) -> Result<Coordinates> {
        self.0.ok_or(WeatherError::PermissionDenied)
    }
}
