use thiserror::Error;

use crate::assets::AssetError;
use crate::settings::SettingsError;

/// Errors that stop a session from starting
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
