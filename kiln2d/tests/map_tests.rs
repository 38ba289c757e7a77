use std::collections::HashMap;
use std::sync::Arc;

use kiln2d::tilemap::{MapObject, Tileset};
use kiln2d::{Camera, TextureHandle, TiledMap, TilemapError};

const TILESET_JSON: &str = r#"
{
  "name": "terrain",
  "columns": 4,
  "tilewidth": 16,
  "tileheight": 16,
  "tilecount": 16,
  "image": "terrain.png",
  "tiles": [
    {
      "id": 5,
      "animation": [
        { "tileid": 5, "duration": 150 },
        { "tileid": 6, "duration": 150 }
      ]
    },
    {
      "id": 0,
      "properties": [ { "name": "solid", "type": "bool", "value": true } ]
    }
  ]
}
"#;

const MAP_JSON: &str = r##"
{
  "width": 8,
  "height": 4,
  "tilewidth": 16,
  "tileheight": 16,
  "tilesets": [ { "firstgid": 1, "source": "terrain" } ],
  "layers": [
    {
      "type": "tilelayer",
      "id": 1,
      "name": "back",
      "width": 8,
      "height": 4,
      "data": [
        1, 0, 0, 0, 999, 0, 0, 0,
        2147483649, 0, 6, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 6,
        0, 0, 0, 0, 0, 0, 0, 0
      ]
    },
    {
      "type": "tilelayer",
      "id": 2,
      "name": "secret",
      "width": 8,
      "height": 4,
      "visible": "0",
      "data": [
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0
      ]
    },
    {
      "type": "objectgroup",
      "id": 10,
      "name": "collisions",
      "color": "#ff0000",
      "objects": [
        { "id": 1, "x": 0, "y": 48, "width": 128, "height": 16 },
        { "id": 2, "x": 32, "y": 16, "width": 16, "height": 16 },
        { "id": 3, "x": 5, "y": 5, "point": true },
        { "id": 4, "x": 64, "y": 0 }
      ]
    }
  ]
}
"##;

fn tilesets() -> HashMap<String, Arc<Tileset>> {
    let mut map = HashMap::new();
    map.insert(
        "terrain".to_string(),
        Arc::new(Tileset::from_json(TILESET_JSON, TextureHandle(1)).unwrap()),
    );
    map
}

fn load_map() -> TiledMap {
    TiledMap::from_json("level", MAP_JSON, &tilesets()).unwrap()
}

#[test]
fn grid_matches_raw_gids() {
    let map = load_map();
    let back = map.layer("back").unwrap();

    // Zero gids leave the cell empty; everything else resolves.
    assert!(back.tile(1, 0).is_none());
    assert!(back.tile(0, 3).is_none());

    let first = back.tile(0, 0).unwrap();
    assert_eq!(first.id, 0);
    assert_eq!(first.tileset, 0);
    assert!(!first.flags.any());
}

#[test]
fn transform_flags_survive_resolution() {
    let map = load_map();

    let resolved = map.resolve(2147483649).unwrap();
    assert_eq!(resolved.local_id, 0);
    assert!(resolved.flags.horizontal);
    assert!(!resolved.flags.vertical);
    assert_eq!(resolved.flags.apply(1), 2147483649);

    let flipped = map.layer("back").unwrap().tile(0, 1).unwrap();
    assert!(flipped.flags.horizontal);
}

#[test]
fn unresolved_gid_leaves_cell_empty() {
    let map = load_map();
    // gid 999 is outside the only tileset range [1, 16]; the load still
    // succeeds and the cell renders nothing.
    assert!(map.layer("back").unwrap().tile(4, 0).is_none());
    assert!(matches!(
        map.resolve(999),
        Err(TilemapError::UnresolvedGid(999))
    ));
}

#[test]
fn visibility_attribute_presence_means_hidden() {
    let map = load_map();
    assert!(map.layer("back").unwrap().visible);
    assert!(!map.layer("secret").unwrap().visible);
}

#[test]
fn animated_tiles_are_registered() {
    let map = load_map();
    let back = map.layer("back").unwrap();

    let tile = back.tile(2, 1).unwrap();
    assert!(tile.animated());
    assert_eq!(tile.frame_index(), 0);
    assert!(back.animated_cells().contains(&(2, 1)));

    // The plain tile at (0, 0) is batched, not animated.
    assert!(!back.tile(0, 0).unwrap().animated());
}

#[test]
fn collision_designation_collects_rectangles() {
    let mut map = load_map();
    assert!(map.collisions().is_empty());

    map.set_collisions_source("collisions").unwrap();
    // Two sized rectangles plus the degenerate one; the point object is a
    // Point shape and stays out.
    assert_eq!(map.collisions().len(), 3);
    assert_eq!(map.collisions()[0].width, 128.0);
    assert_eq!(map.collisions()[2].width, 0.0);

    let group = map.objectgroup("collisions").unwrap();
    assert!(group
        .objects
        .iter()
        .any(|o| matches!(o, MapObject::Point(_))));
}

#[test]
fn missing_collision_group_fails_fast() {
    let mut map = load_map();
    let err = map.set_collisions_source("nope").unwrap_err();
    assert!(matches!(
        err,
        TilemapError::MissingObjectGroup { group, .. } if group == "nope"
    ));
}

#[test]
fn missing_tileset_reference_is_an_error() {
    let err = TiledMap::from_json("level", MAP_JSON, &HashMap::new()).unwrap_err();
    assert!(matches!(err, TilemapError::MissingTileset(source) if source == "terrain"));
}

#[test]
fn layer_size_mismatch_is_an_error() {
    let bad = r#"
    {
      "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
      "tilesets": [ { "firstgid": 1, "source": "terrain" } ],
      "layers": [
        { "type": "tilelayer", "id": 1, "name": "oops",
          "width": 2, "height": 2, "data": [1, 2, 3] }
      ]
    }
    "#;
    let err = TiledMap::from_json("level", bad, &tilesets()).unwrap_err();
    assert!(matches!(
        err,
        TilemapError::LayerSizeMismatch { layer, got: 3, expected: 4 } if layer == "oops"
    ));
}

#[test]
fn animation_ticks_only_inside_camera_windows() {
    let mut map = load_map();

    // A 64x64 view at the origin covers cells x in [0, 6), y over the whole
    // (clamped) map; the animated tile at (7, 2) sits outside the window.
    let mut camera = Camera::new("game", 0);
    camera.reset((0.0, 0.0), (64.0, 64.0));

    map.update(0.2, std::slice::from_ref(&camera));

    let back = map.layer("back").unwrap();
    assert_eq!(back.tile(2, 1).unwrap().frame_index(), 1);
    assert_eq!(back.tile(7, 2).unwrap().frame_index(), 0);
}

#[test]
fn layer_properties_decode_typed_values() {
    let tilesets = tilesets();
    let ts = tilesets.get("terrain").unwrap();
    let props = ts.properties.get(&0).unwrap();
    assert_eq!(props.get("solid").and_then(|p| p.as_bool()), Some(true));
    assert_eq!(ts.animations.get(&5).map(|a| a.len()), Some(2));
}
