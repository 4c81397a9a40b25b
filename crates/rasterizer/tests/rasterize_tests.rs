//! End-to-end tests: features in, tile rasters out.

use geo_common::{Bounded, RawGeometry, Segment};
use projection::math::ARC;
use projection::{Equirectangular, FieldSource, GeographicProjection, ProjectionConfig, VECTOR_SCALE_FACTOR};
use rasterizer::line::draw_wide_line;
use rasterizer::{
    build_elements, scanline_crossings, DrawFunction, ElementStyle, Feature, TilePos, TileRaster,
    TileRasterizer, TILE_SIZE,
};
use spatial_index::Bvh;
use test_utils::{identity_field_text, polygons, random_segments, seeded_rng};

fn fill_style(value: i32) -> ElementStyle {
    ElementStyle::fill(0, DrawFunction::fill(value), 0)
}

fn edges_of(rings: Vec<Vec<[f64; 2]>>) -> Bvh<Segment> {
    rings
        .iter()
        .flat_map(|ring| ring.windows(2).map(|w| Segment::new(w[0][0], w[0][1], w[1][0], w[1][1])))
        .collect()
}

// ============================================================================
// Scanline fill
// ============================================================================

#[test]
fn test_square_scan_single_interval() {
    let edges = edges_of(polygons::unit_square());
    assert_eq!(scanline_crossings(&edges, 5.0), vec![0.0, 10.0]);
}

#[test]
fn test_hole_scan_two_pairs() {
    let edges = edges_of(polygons::square_with_hole());
    assert_eq!(scanline_crossings(&edges, 5.0), vec![0.0, 3.0, 7.0, 10.0]);
    // Outside the hole's x range there is a single pair
    assert_eq!(scanline_crossings(&edges, 1.0), vec![0.0, 10.0]);
}

#[test]
fn test_hole_excluded_from_fill() {
    let features = vec![Feature::new(
        "ring",
        RawGeometry::Polygon(polygons::square_with_hole()),
        fill_style(1),
    )];
    let elements = build_elements(features, &Equirectangular).unwrap();
    let raster = TileRasterizer::new(elements).rasterize(TilePos::new(0, 0));

    for z in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let in_outer = x < 10 && z < 10;
            let in_hole = (3..7).contains(&x) && (3..7).contains(&z);
            assert_eq!(
                raster.get(x, z),
                i32::from(in_outer && !in_hole),
                "cell ({}, {})",
                x,
                z
            );
        }
    }
    assert_eq!(raster.count_nonzero(), 100 - 16);
}

// ============================================================================
// Wide lines
// ============================================================================

#[test]
fn test_wide_line_matches_brute_force() {
    let mut rng = seeded_rng(11);
    let segments = random_segments(&mut rng, 200, 64.0, 12.0);
    let radius = 1.5;
    let bvh = Bvh::build(segments.clone());

    for pos in [TilePos::new(0, 0), TilePos::new(-2, 1), TilePos::new(3, -4)] {
        let mut raster = TileRaster::new(pos);
        draw_wide_line(&bvh, radius, &mut raster, &DrawFunction::add_weight(), 1);

        for z in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let px = (pos.min_block_x() + x as i64) as f64;
                let pz = (pos.min_block_z() + z as i64) as f64;
                let expected = segments.iter().any(|s| s.within(px, pz, radius));
                assert_eq!(raster.get(x, z), i32::from(expected), "{:?} ({}, {})", pos, x, z);
            }
        }
    }
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn test_ingestion_skips_bad_features() {
    let line = ElementStyle::line(1, 1.0, DrawFunction::fill(2), 0).unwrap();
    let features = vec![
        Feature::new("ok-fill", RawGeometry::Polygon(polygons::unit_square()), fill_style(1)),
        Feature::new(
            "short-ring",
            RawGeometry::Polygon(vec![polygons::degenerate_ring()]),
            fill_style(1),
        ),
        Feature::new(
            "off-map",
            RawGeometry::LineString(vec![[0.0, 0.0], [0.0, 95.0]]),
            line.clone(),
        ),
        Feature::new(
            "fill-a-line",
            RawGeometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]),
            fill_style(1),
        ),
        Feature::new(
            "ok-line",
            RawGeometry::LineString(vec![[0.0, 0.0], [5.0, 5.0]]),
            line,
        ),
    ];

    let elements = build_elements(features, &Equirectangular).unwrap();
    let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["ok-fill", "ok-line"]);
}

// ============================================================================
// Tile rendering
// ============================================================================

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = seeded_rng(21);
    let features: Vec<Feature> = random_segments(&mut rng, 300, 150.0, 20.0)
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let style = ElementStyle::line(i as i32 % 3, 1.0, DrawFunction::max_weight(), i as i32)
                .unwrap();
            // Keep coordinates inside the geodetic range
            let coords = vec![[s.x0 / 2.0, s.z0 / 2.0], [s.x1 / 2.0, s.z1 / 2.0]];
            Feature::new(format!("line-{}", i), RawGeometry::LineString(coords), style)
        })
        .collect();

    let rasterizer = TileRasterizer::new(build_elements(features, &Equirectangular).unwrap());
    let tiles: Vec<TilePos> = (-6..6)
        .flat_map(|x| (-6..6).map(move |z| TilePos::new(x, z)))
        .collect();

    let parallel = rasterizer.rasterize_all(&tiles);
    assert_eq!(parallel.len(), tiles.len());
    for (pos, raster) in tiles.iter().zip(&parallel) {
        assert_eq!(raster.pos(), *pos);
        assert_eq!(*raster, rasterizer.rasterize(*pos));
    }
    assert!(parallel.iter().any(|r| r.count_nonzero() > 0));
}

#[test]
fn test_world_pipeline_fills_tile() {
    let text = identity_field_text(32, ARC, VECTOR_SCALE_FACTOR);
    let config = ProjectionConfig::Scale {
        delegate: Box::new(ProjectionConfig::FlipVertical {
            delegate: Box::new(ProjectionConfig::ModifiedAirocean {
                field: FieldSource::text(text),
                side: 32,
            }),
        }),
        x: 7318261.522857145,
        y: 7318261.522857145,
    };
    let world = config.build().unwrap();

    // A block of Paris roughly 150 by 220 meters
    let (lon, lat) = (2.350987, 48.856667);
    let d = 0.001;
    let ring = vec![
        [lon - d, lat - d],
        [lon - d, lat + d],
        [lon + d, lat + d],
        [lon + d, lat - d],
        [lon - d, lat - d],
    ];
    let features = vec![Feature::new("paris", RawGeometry::Polygon(vec![ring]), fill_style(5))];
    let elements = build_elements(features, &world).unwrap();
    assert_eq!(elements.len(), 1);

    let (x, z) = world.from_geodetic(lon, lat).unwrap();
    let centre = TilePos::containing(x.floor() as i64, z.floor() as i64);
    assert!(elements[0].bounds().intersects(&centre.bounds()));

    let rasterizer = TileRasterizer::new(elements);
    let raster = rasterizer.rasterize(centre);
    assert_eq!(raster.count_nonzero(), TILE_SIZE * TILE_SIZE);
    assert!(raster.cells().iter().all(|&v| v == 5));

    let far = TilePos::new(centre.x + 1000, centre.z);
    assert_eq!(rasterizer.rasterize(far).count_nonzero(), 0);
}
