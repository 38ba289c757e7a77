//! Headless platformer demo: loads a small map, runs a player against its
//! collision geometry for a few seconds of simulated frames, and prints what
//! the compositor would hand to a rasterizer each frame.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use kiln2d::{
    Animation, AnimationFrame, DrawableStore, FrameContext, InputState, KeyCode, Layer, Mask,
    PlatformerEntity, Rect, SpriteSheet, Stage, Surface, TextureHandle, TiledMap, Tileset,
    UpdateContext, Vec2,
};

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
      "id": 1,
      "animation": [
        { "tileid": 1, "duration": 200 },
        { "tileid": 2, "duration": 200 }
      ]
    }
  ]
}
"#;

const MAP_JSON: &str = r#"
{
  "width": 20,
  "height": 6,
  "tilewidth": 16,
  "tileheight": 16,
  "tilesets": [ { "firstgid": 1, "source": "terrain" } ],
  "layers": [
    {
      "type": "tilelayer",
      "id": 1,
      "name": "back",
      "width": 20,
      "height": 6,
      "data": [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1
      ]
    },
    {
      "type": "objectgroup",
      "id": 10,
      "name": "collisions",
      "objects": [
        { "id": 1, "x": 0, "y": 80, "width": 320, "height": 16 }
      ]
    }
  ]
}
"#;

fn character_sheet() -> Arc<SpriteSheet> {
    let mut anims = HashMap::new();
    anims.insert(
        "idle".to_string(),
        Animation::new(
            vec![
                AnimationFrame::new(Rect::new((0.0, 0.0), (16.0, 24.0)), 300)
                    .with_origin((8.0, 24.0)),
                AnimationFrame::new(Rect::new((16.0, 0.0), (16.0, 24.0)), 300)
                    .with_origin((8.0, 24.0)),
            ],
            true,
        ),
    );
    anims.insert(
        "walk".to_string(),
        Animation::new(
            vec![
                AnimationFrame::new(Rect::new((0.0, 24.0), (16.0, 24.0)), 100)
                    .with_origin((8.0, 24.0)),
                AnimationFrame::new(Rect::new((16.0, 24.0), (16.0, 24.0)), 100)
                    .with_origin((8.0, 24.0)),
            ],
            true,
        ),
    );
    SpriteSheet::new("adventurer", TextureHandle(2), anims)
}

fn main() -> Result<()> {
    let mut tilesets = HashMap::new();
    tilesets.insert(
        "terrain".to_string(),
        Arc::new(Tileset::from_json(TILESET_JSON, TextureHandle(1))?),
    );
    let mut map = TiledMap::from_json("level", MAP_JSON, &tilesets)?;
    map.set_collisions_source("collisions")?;

    let mut store = DrawableStore::new();
    let mut player = PlatformerEntity::new("player", character_sheet());
    player.entity.set_position((32.0, 64.0));
    let player_id = store.insert(player);

    let mut stage = Stage::new(320.0, 96.0);
    let scene = stage.create_scene(320, 96);
    let camera = stage.create_camera(
        "game",
        0,
        Rect::new((0.0, 0.0), (160.0, 96.0)),
        None,
    );
    stage.camera_mut(camera).follow(player_id);
    stage.camera_mut(camera).set_scene(scene);

    let mut map_layer = Layer::new("map");
    map_layer.add_map_layer("back");
    stage.scene_mut(scene).add_layer(map_layer, 0);

    let mut entities = Layer::new("entities");
    entities.auto_ysort = true;
    entities.add(player_id);
    stage.scene_mut(scene).add_layer(entities, 1);

    let mut light = Mask::new("light", 320, 96, kiln2d::Color::rgba(20, 10, 50, 220));
    light.add(player_id);
    stage.scene_mut(scene).add_mask(light, 2);

    stage.scale_view(Vec2::new(960.0, 288.0));

    let mut inputs = InputState::new();
    let mut window = Surface::new(960, 288);
    let dt = 1.0 / 60.0;

    for frame in 0..180 {
        inputs.begin_frame();
        // Scripted input: run right the whole time, hop twice.
        if frame == 0 {
            inputs.press(KeyCode::ArrowRight);
        }
        if frame == 30 || frame == 90 {
            inputs.press(KeyCode::ArrowUp);
        }
        if frame == 31 || frame == 91 {
            inputs.release(KeyCode::ArrowUp);
        }

        let update_ctx = UpdateContext::from_map(&map);
        if let Some(player) = store.get_mut::<PlatformerEntity>(player_id) {
            player.update(dt, &inputs, &update_ctx);
        }
        map.update(dt, stage.cameras());

        let frame_ctx = FrameContext::new(&store).with_map(&map);
        stage.update_cameras(dt, &frame_ctx);
        stage.render(&mut window, &frame_ctx);
    }

    let player = store.get::<PlatformerEntity>(player_id).unwrap();
    println!(
        "after 180 frames: position=({:.1}, {:.1}) onground={} commands={}",
        player.entity.x(),
        player.entity.y(),
        player.onground,
        window.commands().len(),
    );
    println!(
        "camera view: {:?} viewport: {:?}",
        stage.camera(camera).bounds(),
        stage.camera(camera).viewport(),
    );

    Ok(())
}
