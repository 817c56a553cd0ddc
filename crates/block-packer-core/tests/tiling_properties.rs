use block_packer_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const REL_TOL: f64 = 1e-9;

fn random_items(rng: &mut StdRng, depth: usize, prefix: &str) -> Vec<BlockInput> {
    let count = rng.gen_range(1..=8);
    (0..count)
        .map(|i| {
            let name = format!("{}{}", prefix, i);
            let total = if rng.gen_bool(0.1) {
                0.0
            } else {
                rng.gen_range(0.01..1000.0)
            };
            let mut item = BlockInput::new(name.clone(), total);
            if depth > 0 && rng.gen_bool(0.4) {
                item = item.sub_tree(random_items(rng, depth - 1, &format!("{}.", name)));
            } else if rng.gen_bool(0.2) {
                item = item.breakdown(true);
            }
            item
        })
        .collect()
}

/// Checks one sibling level against its parent rectangle, then recurses.
fn check_level(parent: &Bounds, inputs: &[BlockInput], blocks: &[Block], eps: f64) {
    assert_eq!(inputs.len(), blocks.len());
    for (input, block) in inputs.iter().zip(blocks) {
        assert_eq!(input.name, block.name, "order must follow input");
        assert!(block.bounds.width >= 0.0 && block.bounds.height >= 0.0);
        assert!(
            parent.contains(&block.bounds, eps),
            "{:?} escapes {:?}",
            block.bounds,
            parent
        );
    }

    for i in 0..blocks.len() {
        for j in (i + 1)..blocks.len() {
            let (a, b) = (&blocks[i].bounds, &blocks[j].bounds);
            assert!(!a.overlaps(b, eps), "{:?} overlaps {:?}", a, b);
        }
    }

    let sum: f64 = blocks.iter().map(|b| b.total).sum();
    if sum > 0.0 {
        let area_eps = REL_TOL * parent.area().max(1.0);
        let covered: f64 = blocks.iter().map(|b| b.bounds.area()).sum();
        assert!(
            (covered - parent.area()).abs() <= area_eps,
            "covered {} of {}",
            covered,
            parent.area()
        );
        for b in blocks {
            let expected = parent.area() * b.total / sum;
            assert!(
                (b.bounds.area() - expected).abs() <= area_eps,
                "{} got area {} expected {}",
                b.name,
                b.bounds.area(),
                expected
            );
        }
    }

    for (input, block) in inputs.iter().zip(blocks) {
        match &input.sub_tree {
            Some(sub) => check_level(&block.bounds, sub, &block.children, eps),
            None => assert!(block.children.is_empty()),
        }
    }
}

fn check_monotonic(blocks: &[Block], eps: f64) {
    for a in blocks {
        for b in blocks {
            if a.total > b.total {
                assert!(
                    a.bounds.area() + eps >= b.bounds.area(),
                    "{} ({}) smaller than {} ({})",
                    a.name,
                    a.bounds.area(),
                    b.name,
                    b.bounds.area()
                );
            }
        }
        check_monotonic(&a.children, eps);
    }
}

fn run_random(strategy: LayoutStrategy, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let cfg = PackerConfig::builder().strategy(strategy).build();
    for _ in 0..50 {
        let w = rng.gen_range(1.0..2000.0);
        let h = rng.gen_range(1.0..2000.0);
        let items = random_items(&mut rng, 3, "n");
        let blocks = pack_with(w, h, &items, &cfg).expect("valid input");
        let canvas = Bounds::new(0.0, 0.0, w, h);
        let eps = REL_TOL * w.max(h);
        check_level(&canvas, &items, &blocks, eps);
        check_monotonic(&blocks, REL_TOL * canvas.area());
    }
}

#[test]
fn slice_and_dice_tiles_random_trees() {
    run_random(LayoutStrategy::SliceAndDice, 42);
}

#[test]
fn squarify_tiles_random_trees() {
    run_random(LayoutStrategy::Squarify, 7);
}

/// Many tiny items: running-sum edges keep the last edge on the canvas edge
#[test]
fn many_items_close_exactly() {
    let items: Vec<BlockInput> = (0..1000)
        .map(|i| BlockInput::new(format!("i{}", i), 0.1 + (i % 7) as f64))
        .collect();
    let blocks = pack(997.0, 13.0, &items).expect("pack");
    let last = blocks.last().expect("non-empty");
    assert_eq!(last.bounds.x + last.bounds.width, 997.0);
    for pair in blocks.windows(2) {
        assert!((pair[0].bounds.right() - pair[1].bounds.x).abs() < 1e-9);
        assert!(pair[0].bounds.x <= pair[1].bounds.x);
    }
}

#[test]
fn slices_along_longer_axis() {
    let items: Vec<BlockInput> = vec![BlockInput::new("a", 1.0), BlockInput::new("b", 1.0)];

    let wide = pack(10.0, 6.0, &items).expect("pack");
    assert_eq!(wide[0].bounds, Bounds::new(0.0, 0.0, 5.0, 6.0));
    assert_eq!(wide[1].bounds, Bounds::new(5.0, 0.0, 5.0, 6.0));

    let tall = pack(6.0, 10.0, &items).expect("pack");
    assert_eq!(tall[0].bounds, Bounds::new(0.0, 0.0, 6.0, 5.0));
    assert_eq!(tall[1].bounds, Bounds::new(0.0, 5.0, 6.0, 5.0));

    let square = pack(8.0, 8.0, &items).expect("pack");
    assert_eq!(square[0].bounds, Bounds::new(0.0, 0.0, 4.0, 8.0));
}

#[test]
fn proportional_areas() {
    let items: Vec<BlockInput> = vec![
        BlockInput::new("a", 1.0),
        BlockInput::new("b", 2.0),
        BlockInput::new("c", 3.0),
        BlockInput::new("d", 4.0),
    ];
    let blocks = pack(50.0, 20.0, &items).expect("pack");
    let a = blocks[0].bounds.area();
    for (block, weight) in blocks.iter().zip([1.0, 2.0, 3.0, 4.0]) {
        assert!((block.bounds.area() / a - weight).abs() < 1e-9);
    }
}
