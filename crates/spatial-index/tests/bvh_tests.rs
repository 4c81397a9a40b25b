//! BVH query exactness against brute force.

use std::sync::Arc;

use geo_common::{Bounded, Bounds2d, Segment};
use spatial_index::Bvh;
use test_utils::{random_bounds, random_segments, seeded_rng};

/// Indexed wrapper so visited sets can be compared by id.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    id: usize,
    segment: Segment,
}

impl Bounded for Tagged {
    fn bounds(&self) -> Bounds2d {
        self.segment.bounds()
    }
}

fn tagged(segments: Vec<Segment>) -> Vec<Tagged> {
    segments
        .into_iter()
        .enumerate()
        .map(|(id, segment)| Tagged { id, segment })
        .collect()
}

fn brute_force(elements: &[Tagged], query: &Bounds2d) -> Vec<usize> {
    let mut ids: Vec<usize> = elements
        .iter()
        .filter(|e| e.bounds().intersects(query))
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    ids
}

fn visited(bvh: &Bvh<Tagged>, query: &Bounds2d) -> Vec<usize> {
    let mut ids = Vec::new();
    bvh.for_each_intersecting(query, |e| ids.push(e.id));
    ids.sort_unstable();
    ids
}

// ============================================================================
// Exactness
// ============================================================================

#[test]
fn test_matches_brute_force() {
    for (seed, n) in [(1u64, 0usize), (2, 1), (3, 10), (4, 1000)] {
        let mut rng = seeded_rng(seed);
        let elements = tagged(random_segments(&mut rng, n, 500.0, 40.0));
        let bvh: Bvh<Tagged> = elements.iter().copied().collect();
        assert_eq!(bvh.len(), n);

        for query in random_bounds(&mut rng, 200, 550.0, 120.0) {
            let expected = brute_force(&elements, &query);
            let got = visited(&bvh, &query);
            assert_eq!(got, expected, "n = {}, query = {:?}", n, query);

            let mut collected: Vec<usize> = bvh.query(&query).iter().map(|e| e.id).collect();
            collected.sort_unstable();
            assert_eq!(collected, expected);
        }
    }
}

#[test]
fn test_no_duplicate_visits() {
    let mut rng = seeded_rng(11);
    let bvh: Bvh<Tagged> = tagged(random_segments(&mut rng, 300, 100.0, 30.0))
        .into_iter()
        .collect();
    let everything = Bounds2d::new(-1e6, 1e6, -1e6, 1e6);
    let ids = visited(&bvh, &everything);
    assert_eq!(ids, (0..300).collect::<Vec<_>>());
}

#[test]
fn test_touching_query_is_visited() {
    let bvh = Bvh::build(vec![Segment::new(0.0, 0.0, 10.0, 0.0)]);
    let mut hits = 0;
    // Shares only the endpoint (10, 0)
    bvh.for_each_intersecting(&Bounds2d::new(10.0, 12.0, -1.0, 1.0), |_| hits += 1);
    assert_eq!(hits, 1);
    bvh.for_each_intersecting(&Bounds2d::new(10.001, 12.0, -1.0, 1.0), |_| hits += 1);
    assert_eq!(hits, 1);
}

#[test]
fn test_coincident_elements() {
    let same = Segment::new(1.0, 1.0, 2.0, 2.0);
    let bvh = Bvh::build(vec![same; 17]);
    assert_eq!(bvh.query(&Bounds2d::point(1.5, 1.5)).len(), 17);
    assert_eq!(bvh.bounds(), Some(same.bounds()));
}

// ============================================================================
// Aggregate bounds
// ============================================================================

#[test]
fn test_aggregate_bounds() {
    let mut rng = seeded_rng(5);
    let segments = random_segments(&mut rng, 64, 100.0, 10.0);
    let expected = Bounds2d::enclosing(segments.iter());
    let bvh = Bvh::build(segments);
    assert_eq!(bvh.bounds(), expected);
}

#[test]
fn test_single_element_bounds() {
    let s = Segment::new(-3.0, 4.0, 5.0, -6.0);
    let bvh = Bvh::build(vec![s]);
    assert_eq!(bvh.bounds(), Some(Bounds2d::new(-3.0, 5.0, -6.0, 4.0)));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_queries() {
    let mut rng = seeded_rng(9);
    let elements = tagged(random_segments(&mut rng, 500, 200.0, 20.0));
    let queries = random_bounds(&mut rng, 64, 220.0, 60.0);
    let bvh = Arc::new(Bvh::build(elements.clone()));

    let handles: Vec<_> = queries
        .chunks(16)
        .map(|chunk| {
            let bvh = Arc::clone(&bvh);
            let chunk = chunk.to_vec();
            std::thread::spawn(move || {
                chunk
                    .iter()
                    .map(|q| visited(&bvh, q))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<usize>> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    for (query, got) in queries.iter().zip(results) {
        assert_eq!(got, brute_force(&elements, query));
    }
}
