use umbra_geom::{Pose, Vec2};
use umbra_lighting::LightingModel;
use umbra_render::{
    DrawCommand, MinimapConfig, Raycaster, RenderConfig, SpriteBob, draw_agent_sprite, project_sprite,
    render_minimap,
};
use umbra_texture::TextureCache;
use umbra_tiles::{MaterialCatalog, Tile};
use umbra_world::{BoundedMap, TileMap};

fn count(cmds: &[DrawCommand]) -> (usize, usize, usize) {
    let mut fills = 0;
    let mut strokes = 0;
    let mut lines = 0;
    for c in cmds {
        match c {
            DrawCommand::FillRect { .. } => fills += 1,
            DrawCommand::StrokeRect { .. } => strokes += 1,
            DrawCommand::Line { .. } => lines += 1,
        }
    }
    (fills, strokes, lines)
}

#[test]
fn minimap_draws_every_tile_of_a_bounded_map() {
    let cat = MaterialCatalog::builtin();
    let map = BoundedMap::demo(&cat);
    let solid = (0..16)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .filter(|&(x, y)| map.tile_at(x, y) != Tile::Open)
        .count();
    let cmds = render_minimap(&Pose::new(2.5, 2.5, 0.0), &map, &cat, &MinimapConfig::default());
    let (fills, strokes, lines) = count(&cmds);
    // background + tiles + viewer marker
    assert_eq!(fills, 1 + 256 + 1);
    assert_eq!(strokes, solid);
    assert_eq!(lines, 1);
    assert!(cmds.contains(&DrawCommand::FillRect {
        x: 640 - 150 - 10 + 14 * 9,
        y: 10 + 13 * 9,
        w: 9,
        h: 9,
        color: [255, 0, 255, 255],
    }));
}

#[test]
fn minimap_windows_unbounded_maps() {
    struct OpenField;
    impl TileMap for OpenField {
        fn tile_at(&self, _: i32, _: i32) -> Tile {
            Tile::Open
        }
    }
    let cat = MaterialCatalog::builtin();
    let cfg = MinimapConfig {
        radius: 3,
        ..MinimapConfig::default()
    };
    let cmds = render_minimap(&Pose::new(-40.2, 12.0, 1.0), &OpenField, &cat, &cfg);
    let (fills, strokes, _) = count(&cmds);
    assert_eq!(fills, 1 + 49 + 1);
    assert_eq!(strokes, 0);
}

#[test]
fn sprite_projection_follows_original_sizing() {
    let cfg = RenderConfig::default();
    let pose = Pose::new(0.0, 0.0, 0.0);
    let p = project_sprite(&pose, Vec2::new(4.0, 0.0), &cfg).unwrap();
    assert_eq!(p.screen_x, 320);
    assert_eq!(p.size, 96);
    assert_eq!(p.screen_y, 240 + 24);

    let near = project_sprite(&pose, Vec2::new(0.5, 0.0), &cfg).unwrap();
    assert_eq!(near.size, 350);
    let far = project_sprite(&pose, Vec2::new(14.0, 0.0), &cfg).unwrap();
    assert_eq!(far.size, 27);
    assert!(project_sprite(&pose, Vec2::new(16.0, 0.0), &cfg).is_none());
    assert!(project_sprite(&pose, Vec2::new(-3.0, 0.0), &cfg).is_none());
    assert!(project_sprite(&pose, Vec2::new(2.0, 2.0), &cfg).is_none());
}

#[test]
fn walls_occlude_sprites() {
    let cat = MaterialCatalog::builtin();
    let cfg = RenderConfig {
        width: 128,
        height: 96,
        ..RenderConfig::default()
    };
    let rc = Raycaster::new(cfg.clone(), &cat);
    let tex = TextureCache::synthesized(&cat, 32, 1);
    let lighting = LightingModel::default();
    let mut map = BoundedMap::open(16, 16, cat.default_wall());
    let pose = Pose::new(2.5, 7.9, 0.0);

    // Open line of sight: every covered column is visible.
    let frame = rc.render_frame(&pose, &map, &lighting, &tex);
    let sprite = project_sprite(&pose, Vec2::new(6.5, 7.9), &cfg).unwrap();
    assert_eq!((sprite.screen_x, sprite.size), (64, 19));
    let visible = frame.visible_columns(&sprite);
    assert_eq!(visible, (55..73).collect::<Vec<_>>());

    // A pillar just off the line of sight hides the sprite's right edge.
    map.set(4, 8, Tile::Wall(cat.default_wall()));
    let mut frame = rc.render_frame(&pose, &map, &lighting, &tex);
    let partly = frame.visible_columns(&sprite);
    assert!(partly.contains(&64));
    assert!(!partly.contains(&70));
    assert!(partly.len() < visible.len());

    let bob = SpriteBob::new(9);
    let before = frame.pixels.clone();
    let drawn = draw_agent_sprite(&mut frame, &sprite, 0.8, 0.0, &bob);
    assert!(drawn > 0);
    for y in 0..96 {
        assert_eq!(frame.pixel(70, y), before[y * 128 + 70]);
    }
    assert!((0..96).any(|y| frame.pixel(62, y) != before[y * 128 + 62]));
    assert_eq!(draw_agent_sprite(&mut frame, &sprite, 0.05, 0.0, &bob), 0);
}
