#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use critbit::{ByteAnalyzer, MutableCritBitTree};

#[derive(Arbitrary, Debug)]
enum MapMethod {
    Get { key: Vec<u8> },
    Insert { key: Vec<u8>, val: usize },
    Update { key: Vec<u8>, val: usize },
    Delete { key: Vec<u8> },
    Prefix { prefix: Vec<u8> },
}

// Bits past the end of a byte key read as zero, so trailing NULs are not significant.
fn normalize(mut key: Vec<u8>) -> Vec<u8> {
    while key.last() == Some(&0) {
        key.pop();
    }
    key
}

fuzz_target!(|methods: Vec<MapMethod>| {
    let mut tree = MutableCritBitTree::new(ByteAnalyzer);
    let mut bt_map = BTreeMap::<Vec<u8>, usize>::new();

    for m in methods {
        match m {
            MapMethod::Get { key } => {
                let key = normalize(key);
                assert_eq!(tree.get(&key), bt_map.get(&key));
            }
            MapMethod::Insert { key, val } => {
                let key = normalize(key);
                assert_eq!(tree.put(key.clone(), val), bt_map.insert(key, val));
            }
            MapMethod::Update { key, val } => {
                let key = normalize(key);
                let old_bt = bt_map.get_mut(&key);
                let old_tree = tree.get_mut(&key);
                assert_eq!(old_tree, old_bt);
                if let (Some(old_tree), Some(old_bt)) = (old_tree, old_bt) {
                    *old_tree = val;
                    *old_bt = val;
                }
            }
            MapMethod::Delete { key } => {
                let key = normalize(key);
                assert_eq!(tree.remove(&key), bt_map.remove(&key));
            }
            MapMethod::Prefix { prefix } => {
                // Only NUL-free prefixes compare like byte slices.
                if prefix.contains(&0) {
                    continue;
                }
                let found: Vec<_> = tree.prefix_iter(&prefix).map(|(k, v)| (k.clone(), *v)).collect();
                let expected: Vec<_> = bt_map
                    .iter()
                    .filter(|(k, _)| k.starts_with(&prefix))
                    .map(|(k, v)| (k.clone(), *v))
                    .collect();
                assert_eq!(found, expected);
            }
        }
        assert_eq!(tree.size(), bt_map.len());
    }
});
