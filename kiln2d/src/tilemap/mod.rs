mod data;
mod layer;
mod map;
mod tileset;

pub use data::{
    FrameData, LayerData, MapData, ObjectData, ObjectGroupData, PointData, PropertyValue,
    RawProperty, TileData, TileLayerData, TilesetData, TilesetRef,
};
pub use layer::{LocalTile, MapObject, ObjectGroup, TileLayer};
pub use map::TiledMap;
pub use tileset::{
    transformed_tex_coords, GidFlags, MapTileset, ResolvedTile, TileFrame, Tileset,
};
