use std::f32::consts::PI;

use umbra_geom::{Pose, Vec2};
use umbra_lighting::{LightingConfig, LightingModel};
use umbra_render::{Raycaster, RenderConfig, Side, cast_ray, project_sprite};
use umbra_texture::TextureCache;
use umbra_tiles::{MaterialCatalog, Tile};
use umbra_world::{BoundedMap, TileMap};

fn setup(cfg: RenderConfig) -> (MaterialCatalog, Raycaster, TextureCache) {
    let cat = MaterialCatalog::builtin();
    let rc = Raycaster::new(cfg, &cat);
    let tex = TextureCache::synthesized(&cat, 64, 7);
    (cat, rc, tex)
}

fn small_cfg() -> RenderConfig {
    RenderConfig {
        width: 96,
        height: 72,
        ..RenderConfig::default()
    }
}

#[test]
fn depth_is_perpendicular_distance_to_flat_wall() {
    let (cat, rc, tex) = setup(small_cfg());
    // Out-of-bounds space is solid, so x = 16 is a flat wall.
    let map = BoundedMap::open(16, 16, cat.default_wall());
    let pose = Pose::new(8.5, 8.5, 0.0);
    let frame = rc.render_frame(&pose, &map, &LightingModel::default(), &tex);
    assert_eq!(frame.depth.len(), 96);
    for (x, d) in frame.depth().iter().enumerate() {
        assert!((d - 7.5).abs() < 1e-3, "column {x}: depth {d}");
    }
}

#[test]
fn depth_matches_single_ray_cast() {
    let (cat, rc, tex) = setup(small_cfg());
    let map = BoundedMap::demo(&cat);
    let pose = Pose::new(2.5, 2.5, 0.6);
    let frame = rc.render_frame(&pose, &map, &LightingModel::default(), &tex);
    for x in [0usize, 17, 48, 95] {
        let hit = cast_ray(&map, &pose, rc.column_angle(&pose, x), 20.0).unwrap();
        assert!((frame.depth[x] - hit.corrected).abs() < 1e-4);
        assert!(hit.tile.is_opaque());
        assert!((0.0..1.0).contains(&hit.tex_u));
    }
}

#[test]
fn cast_ray_reports_side_and_tile() {
    let cat = MaterialCatalog::builtin();
    let map = BoundedMap::demo(&cat);
    let pose = Pose::new(1.5, 1.5, 0.0);
    let hit = cast_ray(&map, &pose, 0.0, 20.0).unwrap();
    assert_eq!(hit.side, Side::X);
    assert_eq!(hit.cell.x, 15);
    assert_eq!(hit.tile, map.tile_at(15, 1));
    assert!((hit.distance - 13.5).abs() < 1e-4);

    let down = cast_ray(&map, &pose, std::f32::consts::FRAC_PI_2, 20.0).unwrap();
    assert_eq!(down.side, Side::Y);
    assert!((down.corrected).abs() < 1e-4);
}

#[test]
fn exits_stop_rays() {
    let cat = MaterialCatalog::builtin();
    let mut map = BoundedMap::open(8, 3, cat.default_wall());
    map.set(5, 1, Tile::Exit);
    let hit = cast_ray(&map, &Pose::new(0.5, 1.5, 0.0), 0.0, 20.0).unwrap();
    assert_eq!(hit.tile, Tile::Exit);
    assert!((hit.distance - 4.5).abs() < 1e-4);
}

#[test]
fn standing_on_an_exit_sees_out_of_it() {
    let (cat, rc, tex) = setup(small_cfg());
    let mut map = BoundedMap::open(16, 16, cat.default_wall());
    map.set(5, 5, Tile::Exit);
    map.set(12, 9, Tile::Exit);
    let pose = Pose::new(5.5, 5.5, 0.0);

    let ahead = cast_ray(&map, &pose, 0.0, 20.0).unwrap();
    assert_eq!(ahead.cell.x, 16);
    assert!((ahead.distance - 10.5).abs() < 1e-4);
    // other exits still stop the ray
    let toward = Vec2::new(12.5, 9.0) - pose.pos;
    let other = cast_ray(&map, &pose, toward.angle(), 20.0).unwrap();
    assert_eq!(other.tile, Tile::Exit);
    assert_eq!((other.cell.x, other.cell.y), (12, 9));

    let frame = rc.render_frame(&pose, &map, &LightingModel::default(), &tex);
    assert!(frame.depth().iter().all(|d| *d > 5.0), "{:?}", &frame.depth()[..4]);
    let sprite = project_sprite(&pose, Vec2::new(9.5, 5.5), rc.config()).unwrap();
    assert!(!frame.visible_columns(&sprite).is_empty());
}

#[test]
fn texture_u_follows_the_crossed_face_and_mirrors() {
    let cat = MaterialCatalog::builtin();
    let mut map = BoundedMap::open(16, 4, cat.default_wall());
    for y in 0..4 {
        map.set(5, y, Tile::Wall(cat.default_wall()));
    }
    // west face of x = 5, a quarter of the way down the cell
    let east = cast_ray(&map, &Pose::new(1.5, 1.25, 0.0), 0.0, 20.0).unwrap();
    assert_eq!(east.side, Side::X);
    assert_eq!(east.cell.x, 5);
    assert!((east.tex_u - 0.75).abs() < 1e-4, "{}", east.tex_u);
    // east face of the same wall, seen from the other side
    let west = cast_ray(&map, &Pose::new(8.5, 1.25, PI), PI, 20.0).unwrap();
    assert_eq!(west.side, Side::X);
    assert_eq!(west.cell.x, 5);
    assert!((west.tex_u - 0.25).abs() < 1e-4, "{}", west.tex_u);
}

#[test]
fn ceiling_rows_mirror_floor_light() {
    let (cat, rc, tex) = setup(small_cfg());
    let map = BoundedMap::open(16, 16, cat.default_wall());
    let frame = rc.render_frame(&Pose::new(8.5, 8.5, 0.0), &map, &LightingModel::default(), &tex);
    let h = frame.height;
    for x in [0usize, 20, 48, 95] {
        for y in 0..6 {
            assert_eq!(frame.shade_at(x, y), frame.shade_at(x, h - 1 - y), "column {x} row {y}");
        }
    }
    assert!(frame.shade_at(48, h - 1) > frame.shade_at(0, h - 1));
}

#[test]
fn flashlight_off_shades_everything_with_ambient() {
    let (cat, rc, tex) = setup(small_cfg());
    let map = BoundedMap::demo(&cat);
    let lighting = LightingModel::new(&LightingConfig {
        flashlight: false,
        ..LightingConfig::default()
    });
    let frame = rc.render_frame(&Pose::new(4.5, 7.5, 0.3), &map, &lighting, &tex);
    let ambient = lighting.ambient();
    assert!(frame.shade.iter().all(|&s| s == ambient));
}

#[test]
fn void_columns_show_only_floor_and_ceiling() {
    let (cat, rc, tex) = setup(RenderConfig {
        max_distance: 5.0,
        ..small_cfg()
    });
    let map = BoundedMap::open(100, 100, cat.default_wall());
    let lighting = LightingModel::default();
    let frame = rc.render_frame(&Pose::new(50.5, 50.5, 1.0), &map, &lighting, &tex);
    assert_eq!(frame.wall_columns(), 0);
    assert!(frame.depth.iter().all(|d| *d == f32::INFINITY));
    // near floor rows are lit by the flashlight, far rows only by ambient
    let bottom = frame.shade_at(48, 71);
    let horizon = frame.shade_at(48, 36);
    assert!(bottom > horizon);
    assert!(frame.shade.iter().all(|s| *s >= lighting.ambient()));
}

#[test]
fn sequential_and_parallel_paths_agree() {
    let (cat, par, tex) = setup(small_cfg());
    let (_, seq, _) = setup(RenderConfig {
        parallel: false,
        ..small_cfg()
    });
    let map = BoundedMap::demo(&cat);
    let pose = Pose::new(7.2, 9.9, -2.1);
    let lighting = LightingModel::default();
    let a = par.render_frame(&pose, &map, &lighting, &tex);
    let b = seq.render_frame(&pose, &map, &lighting, &tex);
    assert_eq!(a.pixels, b.pixels);
    assert_eq!(a.depth, b.depth);
}

#[test]
fn png_export_has_frame_dimensions() {
    let (cat, rc, tex) = setup(small_cfg());
    let map = BoundedMap::demo(&cat);
    let frame = rc.render_frame(&Pose::new(2.5, 2.5, 0.0), &map, &LightingModel::default(), &tex);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    frame.save_png(&path).unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (96, 72));
}
