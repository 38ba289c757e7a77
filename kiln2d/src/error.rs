use thiserror::Error;

/// Errors produced while loading or querying tile maps.
#[derive(Debug, Error)]
pub enum TilemapError {
    /// A raw GID (after clearing transform flags) falls outside every
    /// tileset range bound to the map. Callers skip the tile.
    #[error("no tileset range contains gid {0}")]
    UnresolvedGid(u32),

    /// The object group designated as collision source does not exist.
    #[error("'{group}' is not an objectgroup of the '{map}' map")]
    MissingObjectGroup { group: String, map: String },

    /// The map or tileset document could not be decoded.
    #[error("failed to parse map data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A layer's tile data does not match its declared dimensions.
    #[error("layer '{layer}' has {got} tiles, expected {expected}")]
    LayerSizeMismatch {
        layer: String,
        got: usize,
        expected: usize,
    },

    /// A map references a tileset document that was not supplied.
    #[error("map references tileset '{0}' which was not provided")]
    MissingTileset(String),
}
