use std::collections::HashMap;
use std::sync::Arc;

use kiln2d::render::quad;
use kiln2d::{
    BlendMode, Camera, CameraState, Color, DrawCommand, Drawable, DrawableStore, FrameContext,
    Layer, Mask, Rect, RenderStates, RenderTarget, Scene, Stage, Surface, TextureHandle,
    TiledMap, Vec2,
};

/// Minimal transient drawable standing in for entities and effects.
struct Dot {
    pos: Vec2,
    color: Color,
    ended: bool,
}

impl Dot {
    fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            color: Color::WHITE,
            ended: false,
        }
    }
}

impl Drawable for Dot {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates, _ctx: &FrameContext) {
        target.draw_vertices(&quad(Rect::new(self.pos, (2.0, 2.0)), self.color), states);
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn ended(&self) -> bool {
        self.ended
    }
}

const MAP_JSON: &str = r#"
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
        1, 2, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
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
        1, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0
      ]
    }
  ]
}
"#;

const TILESET_JSON: &str = r#"
{ "name": "terrain", "columns": 4, "tilewidth": 16, "tileheight": 16,
  "tilecount": 16, "image": "terrain.png" }
"#;

fn load_map() -> TiledMap {
    let mut tilesets = HashMap::new();
    tilesets.insert(
        "terrain".to_string(),
        Arc::new(kiln2d::Tileset::from_json(TILESET_JSON, TextureHandle(1)).unwrap()),
    );
    TiledMap::from_json("level", MAP_JSON, &tilesets).unwrap()
}

#[test]
fn layer_draws_before_mask_at_equal_order() {
    let mut store = DrawableStore::new();
    let sprite_id = store.insert(Dot::at(4.0, 4.0));
    let light_id = store.insert(Dot::at(8.0, 8.0));

    let mut layer = Layer::new("entities");
    layer.add(sprite_id);

    let fill = Color::rgba(20, 10, 50, 220);
    let mut mask = Mask::new("light", 64, 64, fill);
    mask.add(light_id);

    let mut scene = Scene::new(64, 64);
    scene.add_layer(layer, 0);
    scene.add_mask(mask, 0);

    let ctx = FrameContext::new(&store);
    scene.render(&ctx);

    let commands = scene.surface().commands();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], DrawCommand::Clear(Color::TRANSPARENT)));
    assert!(matches!(
        &commands[1],
        DrawCommand::Vertices { states, .. } if states.blend == BlendMode::Alpha
    ));

    // The mask arrives last as one composited sprite whose own pass starts
    // from the fill color and replaces rather than blends.
    let DrawCommand::Blit { commands: inner, .. } = &commands[2] else {
        panic!("expected the mask blit last");
    };
    assert!(matches!(inner[0], DrawCommand::Clear(c) if c == fill));
    assert!(matches!(
        &inner[1],
        DrawCommand::Vertices { states, .. } if states.blend == BlendMode::Replace
    ));
}

#[test]
fn ended_and_dangling_drawables_are_pruned() {
    let mut store = DrawableStore::new();
    let done = store.insert(Dot {
        pos: Vec2::ZERO,
        color: Color::WHITE,
        ended: true,
    });
    let gone = store.insert(Dot::at(0.0, 0.0));
    let kept = store.insert(Dot::at(0.0, 0.0));
    store.remove(gone);

    let mut layer = Layer::new("effects");
    layer.add(done);
    layer.add(gone);
    layer.add(kept);

    let ctx = FrameContext::new(&store);
    layer.update(&ctx);

    assert_eq!(layer.items().len(), 1);
    assert_eq!(layer.items()[0], kiln2d::DrawRef::Stored(kept));
}

#[test]
fn ysort_orders_by_vertical_position() {
    let mut store = DrawableStore::new();
    let low = store.insert(Dot::at(0.0, 50.0));
    let high = store.insert(Dot::at(0.0, 10.0));
    let mid = store.insert(Dot::at(0.0, 30.0));

    let mut layer = Layer::new("entities");
    layer.add(low);
    layer.add(high);
    layer.add(mid);

    let ctx = FrameContext::new(&store);
    layer.ysort(&ctx);

    let ys: Vec<f32> = layer
        .items()
        .iter()
        .map(|item| match item {
            kiln2d::DrawRef::Stored(id) => store.get_dyn(*id).unwrap().position().y,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(ys, vec![10.0, 30.0, 50.0]);
}

#[test]
fn hidden_map_layers_draw_nothing() {
    let store = DrawableStore::new();
    let map = load_map();
    let ctx = FrameContext::new(&store).with_map(&map);

    let mut layer = Layer::new("map");
    layer.add_map_layer("back");
    let mut surface = Surface::new(128, 64);
    layer.draw(&mut surface, RenderStates::default(), &ctx);
    assert!(!surface.commands().is_empty());

    let mut hidden = Layer::new("hidden");
    hidden.add_map_layer("secret");
    let mut surface = Surface::new(128, 64);
    hidden.draw(&mut surface, RenderStates::default(), &ctx);
    assert!(surface.commands().is_empty());
}

#[test]
fn camera_clamps_to_map_bounds_while_following() {
    let mut store = DrawableStore::new();
    let target = store.insert(Dot::at(1000.0, 32.0));
    let map = load_map();

    let mut camera = Camera::new("game", 0);
    camera.reset((0.0, 0.0), (64.0, 64.0));
    camera.follow(target);

    let ctx = FrameContext::new(&store).with_map(&map);
    camera.update(1.0 / 60.0, &ctx);

    // One smoothed step toward the far target hits the map's right edge and
    // stops exactly there (map is 128px wide).
    assert_eq!(camera.right(), 128.0);
    assert_eq!(camera.left(), 64.0);
}

#[test]
fn zero_delay_camera_snaps_to_target() {
    let mut store = DrawableStore::new();
    let target = store.insert(Dot::at(1000.0, 32.0));
    let map = load_map();

    let mut camera = Camera::new("minimap", 1);
    camera.reset((0.0, 0.0), (64.0, 64.0));
    camera.frames_delay = 0;
    camera.follow(target);

    let ctx = FrameContext::new(&store).with_map(&map);
    camera.update(1.0 / 60.0, &ctx);

    assert_eq!(camera.center(), Vec2::new(1000.0, 32.0));
}

#[test]
fn removed_follow_target_is_skipped() {
    let mut store = DrawableStore::new();
    let target = store.insert(Dot::at(500.0, 0.0));

    let mut camera = Camera::new("game", 0);
    camera.reset((0.0, 0.0), (64.0, 64.0));
    camera.follow(target);
    store.remove(target);

    let ctx = FrameContext::new(&store);
    camera.update(1.0 / 60.0, &ctx);
    assert_eq!(camera.center(), Vec2::new(32.0, 32.0));
}

#[test]
fn quake_expires_back_to_idle() {
    fastrand::seed(7);
    let store = DrawableStore::new();
    let ctx = FrameContext::new(&store);

    let mut camera = Camera::new("game", 0);
    camera.reset((0.0, 0.0), (64.0, 64.0));
    camera.quake(1.0, 4.0, true, true);
    assert!(matches!(camera.state(), CameraState::Quake { .. }));

    camera.update(0.5, &ctx);
    assert!(matches!(camera.state(), CameraState::Quake { .. }));

    camera.update(0.6, &ctx);
    assert!(matches!(camera.state(), CameraState::Idle));

    // Once idle, the last shake offset is removed and the view settles back.
    camera.update(0.1, &ctx);
    assert!((camera.center() - Vec2::new(32.0, 32.0)).length() < 1e-3);
}

#[test]
fn retriggering_quake_restarts_it() {
    let mut camera = Camera::new("game", 0);
    camera.quake(5.0, 2.0, true, true);
    let store = DrawableStore::new();
    let ctx = FrameContext::new(&store);
    camera.update(3.0, &ctx);

    camera.quake(5.0, 2.0, true, true);
    match camera.state() {
        CameraState::Quake { elapsed, .. } => assert_eq!(*elapsed, 0.0),
        CameraState::Idle => panic!("quake should be active"),
    }
}

#[test]
fn scale_view_letterboxes_and_pillarboxes() {
    let mut stage = Stage::new(960.0, 540.0);
    let cam = stage.create_camera(
        "game",
        0,
        Rect::new((0.0, 0.0), (320.0, 192.0)),
        None,
    );

    // Twice as wide as the design: pillarbox to the middle half.
    stage.scale_view(Vec2::new(1920.0, 540.0));
    let vp = stage.camera(cam).viewport();
    assert!((vp.left - 0.25).abs() < 1e-6);
    assert!((vp.width - 0.5).abs() < 1e-6);
    assert_eq!(vp.top, 0.0);
    assert_eq!(vp.height, 1.0);

    // Twice as tall: letterbox to the middle half.
    stage.scale_view(Vec2::new(960.0, 1080.0));
    let vp = stage.camera(cam).viewport();
    assert_eq!(vp.left, 0.0);
    assert_eq!(vp.width, 1.0);
    assert!((vp.top - 0.25).abs() < 1e-6);
    assert!((vp.height - 0.5).abs() < 1e-6);
}

#[test]
fn cameras_present_scenes_in_render_order() {
    let store = DrawableStore::new();
    let mut stage = Stage::new(960.0, 540.0);

    let world = stage.create_scene(64, 64);
    let hud = stage.create_scene(32, 32);

    let ui_cam = stage.create_camera("ui", 1, Rect::new((0.0, 0.0), (32.0, 32.0)), None);
    let game_cam = stage.create_camera("game", 0, Rect::new((0.0, 0.0), (64.0, 64.0)), None);
    stage.camera_mut(ui_cam).set_scene(hud);
    stage.camera_mut(game_cam).set_scene(world);

    let ctx = FrameContext::new(&store);
    let mut window = Surface::new(960, 540);
    stage.render(&mut window, &ctx);

    let blit_sizes: Vec<u32> = window
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Blit { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    // Order 0 (the 64px world scene) is presented before order 1 (the hud).
    assert_eq!(blit_sizes, vec![64, 32]);
}
