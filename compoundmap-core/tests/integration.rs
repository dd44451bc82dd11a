//! End-to-end container behavior: key identity, pruning, strategies, and
//! the large shuffled scenario.

use std::cmp::Ordering;

use compoundmap_core::{
    CompoundKey, CompoundMap, InsertionOrder, KeyOrder, ScalarError, Selector, Token, Value,
    compare,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;

fn key(fields: &[(&str, i64)]) -> CompoundKey {
    fields.iter().map(|&(s, v)| (s, v)).collect()
}

#[test]
fn identity_is_independent_of_field_order() {
    let fields = [("a", 1), ("b", 2), ("c", 3)];
    let mut map: CompoundMap<&str> = CompoundMap::new();
    map.set(&key(&fields), "v").unwrap();

    // Every declaration order of the same fields finds the entry.
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let permuted: CompoundKey = order.iter().map(|&i| fields[i]).collect();
        assert_eq!(map.get(&permuted).unwrap(), Some(&"v"), "{order:?}");
    }
    assert_eq!(map.len(), 1);
}

#[test]
fn insertion_order_strategy_distinguishes_declaration_order() {
    let mut map: CompoundMap<&str, InsertionOrder> = CompoundMap::with_order(InsertionOrder);
    let ab = CompoundKey::new().field("a", 1).field("b", 2);
    let ba = CompoundKey::new().field("b", 2).field("a", 1);

    map.set(&ab, "first").unwrap();
    assert_eq!(map.get(&ab).unwrap(), Some(&"first"));
    assert_eq!(map.get(&ba).unwrap(), None);

    map.set(&ba, "second").unwrap();
    assert_eq!(map.len(), 2);
}

#[test]
fn prefix_independence() {
    let mut map: CompoundMap<char> = CompoundMap::new();
    map.set(&key(&[("a", 1), ("b", 2)]), 'x').unwrap();
    map.set(&key(&[("a", 1), ("b", 3)]), 'y').unwrap();

    assert_eq!(map.get(&key(&[("a", 1)])).unwrap(), None);
    assert_eq!(map.get(&key(&[("a", 1), ("b", 2)])).unwrap(), Some(&'x'));
    assert_eq!(map.get(&key(&[("a", 1), ("b", 3)])).unwrap(), Some(&'y'));
}

#[test]
fn delete_prunes_without_over_deleting() {
    let mut map: CompoundMap<u32> = CompoundMap::new();
    map.set(&key(&[("a", 1), ("b", 2)]), 1).unwrap();
    map.set(&key(&[("a", 1), ("b", 3)]), 11).unwrap();

    assert!(map.delete(&key(&[("a", 1), ("b", 2)])).unwrap());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&key(&[("a", 1), ("b", 2)])).unwrap(), None);
    assert_eq!(map.get(&key(&[("a", 1), ("b", 3)])).unwrap(), Some(&11));
}

#[test]
fn deleting_an_internal_node_keeps_descendants() {
    let mut map: CompoundMap<u32> = CompoundMap::new();
    map.set(&key(&[("a", 1), ("b", 2)]), 1).unwrap();
    map.set(&key(&[("a", 1), ("b", 3)]), 2).unwrap();
    map.set(&key(&[("a", 1)]), 3).unwrap();
    assert_eq!(map.len(), 3);

    assert!(map.delete(&key(&[("a", 1)])).unwrap());
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&key(&[("a", 1), ("b", 2)])).unwrap(), Some(&1));
    assert_eq!(map.get(&key(&[("a", 1), ("b", 3)])).unwrap(), Some(&2));
}

#[test]
fn size_tracks_presence_not_operations() {
    let mut map: CompoundMap<u32> = CompoundMap::new();
    let k1 = key(&[("a", 1)]);
    let k2 = key(&[("b", 2)]);

    map.set(&k1, 1).unwrap().set(&k1, 2).unwrap();
    assert_eq!(map.len(), 1);
    map.set(&k2, 3).unwrap();
    assert_eq!(map.len(), 2);
    assert!(!map.delete(&key(&[("c", 3)])).unwrap());
    assert_eq!(map.len(), 2);
    assert!(map.delete(&k1).unwrap());
    assert!(!map.delete(&k1).unwrap());
    assert_eq!(map.len(), 1);
}

#[test]
fn token_fields_participate_in_keys() {
    let tok = Token::new("axis");
    let mut map: CompoundMap<&str> = CompoundMap::new();
    let k = CompoundKey::new()
        .field(tok.clone(), "vertical")
        .field("scale", 2);
    map.set(&k, "entry").unwrap();

    // Same token, either declaration order.
    let same = CompoundKey::new()
        .field("scale", 2)
        .field(tok.clone(), "vertical");
    assert_eq!(map.get(&same).unwrap(), Some(&"entry"));

    // A different token with the same description is a different field.
    let other = CompoundKey::new()
        .field(Token::new("axis"), "vertical")
        .field("scale", 2);
    assert_eq!(map.get(&other).unwrap(), None);

    // Token values compare by identity too.
    let by_value = CompoundKey::new().field("id", Token::new("v"));
    map.set(&by_value, "tok-value").unwrap();
    assert_eq!(map.get(&by_value).unwrap(), Some(&"tok-value"));
}

/// Orders selectors by the comparator applied to the *field values*, which
/// makes a non-scalar field value reachable from a map operation.
struct ValueOrdered;

impl KeyOrder for ValueOrdered {
    fn order(&self, key: &CompoundKey) -> Result<Vec<Selector>, ScalarError> {
        let mut selectors: Vec<Selector> = key.selectors().cloned().collect();
        let mut failed = None;
        selectors.sort_by(|a, b| match compare(&key.get(a), &key.get(b)) {
            Ok(ordering) => ordering,
            Err(err) => {
                failed = Some(err);
                Ordering::Equal
            }
        });
        match failed {
            Some(err) => Err(err),
            None => Ok(selectors),
        }
    }
}

#[test]
fn custom_strategy_is_injectable() {
    let mut map: CompoundMap<u32, ValueOrdered> = CompoundMap::with_order(ValueOrdered);
    let k = key(&[("b", 1), ("a", 2)]);
    map.set(&k, 5).unwrap();
    assert_eq!(map.get(&k).unwrap(), Some(&5));
}

#[test]
fn non_scalar_error_propagates_and_leaves_map_unmodified() {
    let mut map: CompoundMap<u32, ValueOrdered> = CompoundMap::with_order(ValueOrdered);
    let fine = key(&[("a", 1)]);
    map.set(&fine, 1).unwrap();

    let nested = CompoundKey::new()
        .field("a", 1)
        .field("list", Value::List(vec![Value::Number(2.0)]));

    assert!(matches!(
        map.set(&nested, 2),
        Err(ScalarError::NonScalar(_))
    ));
    assert!(map.get(&nested).is_err());
    assert!(map.delete(&nested).is_err());

    // The failure happened during linearization; nothing was touched.
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&fine).unwrap(), Some(&1));
}

#[test]
fn large_shuffled_scenario() {
    let mut keys: Vec<(CompoundKey, u32)> = Vec::new();
    for a in 0..15i64 {
        keys.push((key(&[("a", a)]), a as u32));
        for b in 0..15i64 {
            keys.push((key(&[("a", a), ("b", b)]), (a * 100 + b) as u32));
            for c in 0..15i64 {
                keys.push((
                    key(&[("a", a), ("b", b), ("c", c)]),
                    (a * 10_000 + b * 100 + c) as u32,
                ));
            }
        }
    }
    assert_eq!(keys.len(), 15 + 15 * 15 + 15 * 15 * 15);

    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    keys.shuffle(&mut rng);

    let mut map: CompoundMap<u32> = CompoundMap::new();
    for (k, v) in &keys {
        map.set(k, *v).unwrap();
    }
    assert_eq!(map.len(), keys.len());

    for (k, v) in &keys {
        assert_eq!(map.get(k).unwrap(), Some(v));
        // The same key with an extra unused field is a different key.
        let decorated = k.clone().field("unused", 999);
        assert_eq!(map.get(&decorated).unwrap(), None);
    }

    keys.shuffle(&mut rng);
    for (k, _) in &keys {
        let decorated = k.clone().field("unused", 999);
        assert!(!map.delete(&decorated).unwrap());
        assert!(map.delete(k).unwrap());
    }
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn comparator_rank_boundaries() {
    let ascending = [
        Value::Absent,
        Value::Null,
        Value::Number(f64::MIN),
        Value::Text(String::new()),
        Value::Token(Token::new("")),
    ];
    for window in ascending.windows(2) {
        assert_eq!(compare(&window[0], &window[1]).unwrap(), Ordering::Less);
        assert_eq!(compare(&window[1], &window[0]).unwrap(), Ordering::Greater);
    }
}
