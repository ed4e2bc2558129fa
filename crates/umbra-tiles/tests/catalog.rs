use proptest::prelude::*;
use umbra_tiles::{CatalogError, MaterialCatalog, MaterialId, Pattern, Tile};

#[test]
fn builtin_has_three_walls_and_surfaces() {
    let cat = MaterialCatalog::builtin();
    let palette = cat.wall_palette();
    assert_eq!(palette.len(), 3);
    assert_eq!(cat.get(palette[0]).unwrap().key, "brick");
    assert_eq!(cat.get(palette[1]).unwrap().key, "stone");
    assert_eq!(cat.get(palette[2]).unwrap().key, "metal");
    assert!(cat.floor().is_some());
    assert!(cat.ceiling().is_some());
    assert_eq!(cat.get(cat.exit().unwrap()).unwrap().pattern, Pattern::Portal);
}

#[test]
fn level_codes_map_to_tiles() {
    let cat = MaterialCatalog::builtin();
    assert_eq!(cat.tile_for_code(0), Tile::Open);
    assert_eq!(cat.tile_for_code(9), Tile::Exit);
    assert_eq!(cat.tile_for_code(2), Tile::Wall(cat.get_id("stone").unwrap()));
    // unknown codes are still solid
    assert_eq!(cat.tile_for_code(7), Tile::Wall(cat.default_wall()));
}

#[test]
fn simple_entries_parse_with_defaults() {
    let cat = MaterialCatalog::from_toml_str(
        r#"
        [materials]
        moss = ["textures/moss.png"]
        "#,
    )
    .unwrap();
    let m = cat.get(cat.get_id("moss").unwrap()).unwrap();
    assert_eq!(m.pattern, Pattern::Flat);
    assert_eq!(m.code, None);
    assert!(cat.wall_palette().is_empty());
}

#[test]
fn duplicate_and_reserved_codes_are_rejected() {
    let dup = MaterialCatalog::from_toml_str(
        r#"
        [materials.a]
        code = 1
        [materials.b]
        code = 1
        "#,
    );
    assert!(matches!(dup, Err(CatalogError::DuplicateCode { code: 1, .. })));
    let reserved = MaterialCatalog::from_toml_str(
        r#"
        [materials.a]
        code = 9
        "#,
    );
    assert!(matches!(reserved, Err(CatalogError::ReservedCode(9))));
}

#[test]
fn tile_queries_are_exhaustive() {
    let wall = Tile::Wall(MaterialId(4));
    assert!(wall.is_wall() && wall.is_opaque() && !wall.is_exit());
    assert!(!Tile::Exit.is_wall() && Tile::Exit.is_opaque() && Tile::Exit.is_exit());
    assert!(!Tile::Open.is_wall() && !Tile::Open.is_opaque());
}

proptest! {
    #[test]
    fn tile_code_roundtrip(id in 0u16..=MaterialId::MAX.0) {
        let t = Tile::Wall(MaterialId(id));
        prop_assert_eq!(Tile::from_code(t.code()), t);
        prop_assert!(t.code() != Tile::Exit.code());
    }
}

#[test]
fn highest_ids_keep_distinct_codes() {
    let top = Tile::Wall(MaterialId::MAX);
    let below = Tile::Wall(MaterialId(MaterialId::MAX.0 - 1));
    assert_ne!(top.code(), below.code());
    assert_eq!(Tile::from_code(top.code()), top);
}

#[test]
fn catalogs_larger_than_the_code_space_are_rejected() {
    let count = MaterialId::MAX.0 as usize + 2;
    let mut src = String::from("[materials]\n");
    for i in 0..count {
        src.push_str(&format!("m{i} = []\n"));
    }
    let err = MaterialCatalog::from_toml_str(&src).unwrap_err();
    assert!(matches!(err, CatalogError::TooManyMaterials(n) if n == count));
}
