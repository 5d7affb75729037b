//! Precedence and merge laws over generated layer stacks.

use std::collections::BTreeMap;
use std::sync::Arc;

use onion::{AnyLayer, ConfigMap, MapLayer, Onion, OnionError, merge_maps, nest};
use proptest::prelude::*;
use proptest::sample::select;
use serde_json::{Value, json};

const GROUPS: [&str; 3] = ["db", "http", "log"];
const KEYS: [&str; 4] = ["host", "port", "user", "mode"];

type Entries = BTreeMap<(&'static str, &'static str), i64>;

fn stacks() -> impl Strategy<Value = Vec<Entries>> {
    let path = (select(GROUPS.to_vec()), select(KEYS.to_vec()));
    prop::collection::vec(prop::collection::btree_map(path, any::<i64>(), 0..8), 0..6)
}

fn to_map(entries: &Entries) -> ConfigMap {
    let parts: Vec<ConfigMap> = entries
        .iter()
        .map(|((group, key), value)| nest(&[*group, *key], json!(value)))
        .collect();
    merge_maps(parts.iter())
}

fn runtime() -> Result<tokio::runtime::Runtime, TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn layers(maps: &[ConfigMap], offset: usize) -> Vec<AnyLayer> {
    maps.iter()
        .enumerate()
        .map(|(index, map)| {
            AnyLayer::eager(MapLayer::new(format!("layer{}", offset + index), map.clone()))
        })
        .collect()
}

/// Split `entries` into three disjoint maps at the two cut points.
fn partition(entries: &BTreeMap<String, i64>, cuts: (usize, usize)) -> [ConfigMap; 3] {
    let (low, high) = (cuts.0.min(cuts.1), cuts.0.max(cuts.1));
    let mut parts = [ConfigMap::new(), ConfigMap::new(), ConfigMap::new()];
    for (index, (key, value)) in entries.iter().enumerate() {
        let [first, second, third] = &mut parts;
        let target = if index < low {
            first
        } else if index < high {
            second
        } else {
            third
        };
        target.insert(key.clone(), json!(value));
    }
    parts
}

proptest! {
    #[test]
    fn the_last_layer_defining_a_key_wins(stack in stacks(), split in 0_usize..8) {
        let maps: Vec<ConfigMap> = stack.iter().map(to_map).collect();
        let (early, late) = maps.split_at(split.min(maps.len()));
        let built = runtime()?.block_on(async {
            let onion = Onion::new();
            onion.add_layers(layers(early, 0)).await?;
            onion.add_layers(layers(late, early.len())).await?;
            Ok::<Onion, Arc<OnionError>>(onion)
        });
        let onion = built.map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(onion.layer_count(), maps.len());

        for group in GROUPS {
            for key in KEYS {
                let expected = stack
                    .iter()
                    .rev()
                    .find_map(|entries| entries.get(&(group, key)))
                    .map(|value| json!(value));
                prop_assert_eq!(onion.get(&format!("{group}.{key}")), expected);
            }
            let whole = maps.iter().rev().find_map(|map| map.get(group).cloned());
            prop_assert_eq!(onion.get(group), whole);
        }
    }

    #[test]
    fn disjoint_maps_merge_to_their_union(
        entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..12),
        cuts in (0_usize..13, 0_usize..13),
    ) {
        let union: ConfigMap = entries
            .iter()
            .map(|(key, value)| (key.clone(), json!(value)))
            .collect();
        let [a, b, c] = partition(&entries, cuts);

        prop_assert_eq!(&merge_maps([&a, &b, &c]), &union);
        prop_assert_eq!(&merge_maps([&c, &b, &a]), &union);
        let left = merge_maps([&a, &b]);
        prop_assert_eq!(&merge_maps([&left, &c]), &union);
        let right = merge_maps([&b, &c]);
        prop_assert_eq!(&merge_maps([&a, &right]), &union);
        prop_assert!(union.values().all(Value::is_i64));
    }
}
