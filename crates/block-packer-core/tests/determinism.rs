use block_packer_core::prelude::*;
use rand::{Rng, SeedableRng};

fn tree(rng: &mut rand::rngs::StdRng, depth: usize) -> Vec<BlockInput> {
    (0..rng.gen_range(1..6))
        .map(|i| {
            let item = BlockInput::new(format!("b{}", i), rng.gen_range(0.0..50.0));
            if depth > 0 && rng.gen_bool(0.5) {
                item.sub_tree(tree(rng, depth - 1))
            } else {
                item
            }
        })
        .collect()
}

#[test]
fn repeated_packs_are_bit_identical() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let items = tree(&mut rng, 4);

    for strategy in [LayoutStrategy::SliceAndDice, LayoutStrategy::Squarify] {
        let cfg = PackerConfig::builder().strategy(strategy).build();
        let first = pack_with(640.0, 480.0, &items, &cfg).expect("pack");
        let second = pack_with(640.0, 480.0, &items, &cfg).expect("pack");

        assert_eq!(first.len(), second.len());
        for ((_, a), (_, b)) in walk_blocks(&first).zip(walk_blocks(&second)) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.bounds.x.to_bits(), b.bounds.x.to_bits());
            assert_eq!(a.bounds.y.to_bits(), b.bounds.y.to_bits());
            assert_eq!(a.bounds.width.to_bits(), b.bounds.width.to_bits());
            assert_eq!(a.bounds.height.to_bits(), b.bounds.height.to_bits());
        }
        assert_eq!(first, second);
    }
}

/// Packing from several threads at once gives the same answer as packing alone
#[test]
fn concurrent_packs_agree() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(9);
    let items = tree(&mut rng, 3);
    let expected = pack(300.0, 200.0, &items).expect("pack");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| pack(300.0, 200.0, &items).expect("pack")))
            .collect();
        for h in handles {
            assert_eq!(h.join().expect("thread"), expected);
        }
    });
}
