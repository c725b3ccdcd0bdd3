#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use critbit::{IntAnalyzer, PersistentCritBitTree};

#[derive(Arbitrary, Debug, Clone)]
enum TreeOp {
    Get { key: i32 },
    Insert { key: i32, val: u32 },
    Remove { key: i32 },
    Snapshot,
    SnapshotAndMutate { idx: usize, key: i32, val: u32 },
}

fuzz_target!(|ops: Vec<TreeOp>| {
    let mut tree = PersistentCritBitTree::new(IntAnalyzer::<i32>::new());
    let mut reference = BTreeMap::<i32, u32>::new();
    let mut snapshots = Vec::new();
    let mut snapshot_maps = Vec::new();

    for op in ops {
        match op {
            TreeOp::Get { key } => {
                assert_eq!(tree.get(&key), reference.get(&key));
            }
            TreeOp::Insert { key, val } => {
                assert_eq!(tree.put(key, val), reference.insert(key, val));
            }
            TreeOp::Remove { key } => {
                assert_eq!(tree.remove(&key), reference.remove(&key));
            }
            TreeOp::Snapshot => {
                snapshots.push(tree.snapshot());
                snapshot_maps.push(reference.clone());
            }
            TreeOp::SnapshotAndMutate { idx, key, val } => {
                if snapshots.is_empty() {
                    continue;
                }
                let idx = idx % snapshots.len();
                let old = snapshot_maps[idx].insert(key, val);
                assert_eq!(snapshots[idx].put(key, val), old);
            }
        }
    }

    assert!(tree.iter().eq(reference.iter()));
    for (snapshot, map) in snapshots.iter().zip(&snapshot_maps) {
        assert_eq!(snapshot.size(), map.len());
        assert!(snapshot.iter().eq(map.iter()));
    }
});
