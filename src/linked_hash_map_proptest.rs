#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can check
// structural invariants (index/order-list consistency, load factor) that
// the public API does not expose.

use crate::{Cursor, CursorFault, Error, LinkedHashMap};
use proptest::prelude::*;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    EraseByCursor(usize),
    Remove(usize),
    Find(usize),
    IndexDefault(usize),
    Mutate(usize, i32),
    Walk,
    Retain(u8),
    Clear,
    Copy,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::EraseByCursor),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Find),
            1 => idx.clone().prop_map(Op::IndexDefault),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Walk),
            1 => any::<u8>().prop_map(Op::Retain),
            1 => Just(Op::Clear),
            1 => Just(Op::Copy),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Insertion-ordered model: a plain vector of pairs.
#[derive(Default)]
struct Model {
    entries: Vec<(String, i32)>,
}

impl Model {
    fn position(&self, k: &str) -> Option<usize> {
        self.entries.iter().position(|(mk, _)| mk == k)
    }
}

fn run<S>(
    sut: &mut LinkedHashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model = Model::default();
    let mut live: HashMap<String, Cursor> = HashMap::new();
    let mut stale: Vec<Cursor> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = &pool[i];
                let before = sut.len();
                let (c, inserted) = sut.insert(k.clone(), v);
                match model.position(k) {
                    Some(p) => {
                        prop_assert!(!inserted);
                        prop_assert_eq!(sut.len(), before);
                        prop_assert_eq!(Some(&c), live.get(k));
                        prop_assert_eq!(c.value(sut), Ok(&model.entries[p].1));
                    }
                    None => {
                        prop_assert!(inserted);
                        model.entries.push((k.clone(), v));
                        live.insert(k.clone(), c);
                    }
                }
            }
            Op::EraseByCursor(i) => {
                let k = &pool[i];
                match live.remove(k) {
                    Some(c) => {
                        let (ek, ev) = sut.erase(c).expect("live cursor erases");
                        let p = model.position(k).expect("model has key");
                        let (mk, mv) = model.entries.remove(p);
                        prop_assert_eq!(ek, mk);
                        prop_assert_eq!(ev, mv);
                        stale.push(c);
                    }
                    None => {
                        let end = sut.end();
                        prop_assert_eq!(
                            sut.erase(end),
                            Err(Error::InvalidCursor(CursorFault::Sentinel))
                        );
                    }
                }
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let got = sut.remove(k.as_str());
                match model.position(k) {
                    Some(p) => {
                        prop_assert_eq!(got, Some(model.entries.remove(p).1));
                        stale.push(live.remove(k).expect("tracked"));
                    }
                    None => prop_assert_eq!(got, None),
                }
            }
            Op::Find(i) => {
                let k = &pool[i];
                let c = sut.find(k.as_str());
                let present = model.position(k).is_some();
                prop_assert_eq!(c != sut.end(), present);
                prop_assert_eq!(sut.count(k.as_str()), usize::from(present));
                prop_assert_eq!(sut.contains_key(k.as_str()), present);
                if present {
                    prop_assert_eq!(Some(&c), live.get(k));
                } else {
                    prop_assert_eq!(sut.at(k.as_str()), Err(Error::KeyNotFound));
                }
            }
            Op::IndexDefault(i) => {
                let k = &pool[i];
                let v = *sut.get_or_insert_default(k.clone());
                match model.position(k) {
                    Some(p) => prop_assert_eq!(v, model.entries[p].1),
                    None => {
                        prop_assert_eq!(v, 0);
                        model.entries.push((k.clone(), 0));
                        live.insert(k.clone(), sut.find(k.as_str()));
                    }
                }
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&c) = live.get(k) {
                    let v = c.value_mut(sut).expect("live cursor resolves");
                    *v = v.wrapping_add(d);
                    let p = model.position(k).expect("model has key");
                    model.entries[p].1 = model.entries[p].1.wrapping_add(d);
                }
            }
            Op::Walk => {
                // Forward to end, then back to begin, comparing with the model.
                let mut c = sut.begin();
                for (mk, mv) in &model.entries {
                    prop_assert_eq!(c.get(sut), Ok((mk, mv)));
                    c.advance(sut).expect("advance within bounds");
                }
                prop_assert_eq!(c, sut.end());
                prop_assert!(c.advance(sut).is_err());
                for (mk, _) in model.entries.iter().rev() {
                    c.retreat(sut).expect("retreat within bounds");
                    prop_assert_eq!(c.key(sut), Ok(mk));
                }
                prop_assert_eq!(
                    c.retreat(sut),
                    Err(Error::InvalidCursor(CursorFault::BeforeFirst))
                );
                prop_assert_eq!(c, sut.begin());
            }
            Op::Retain(m) => {
                let keep = |v: i32| v.rem_euclid(3) != i32::from(m % 3);
                sut.retain(|_, v| keep(*v));
                let (kept, dropped): (Vec<_>, Vec<_>) =
                    model.entries.drain(..).partition(|(_, v)| keep(*v));
                model.entries = kept;
                for (k, _) in dropped {
                    stale.push(live.remove(&k).expect("tracked"));
                }
            }
            Op::Clear => {
                let buckets = sut.bucket_count();
                sut.clear();
                prop_assert_eq!(sut.bucket_count(), buckets);
                prop_assert_eq!(sut.begin(), sut.end());
                model.entries.clear();
                stale.extend(live.drain().map(|(_, c)| c));
            }
            Op::Copy => {
                let mut copy = sut.clone();
                copy.assert_invariants();
                prop_assert!(copy == *sut);
                // Mutating the copy leaves the original alone.
                copy.insert("copy-only".to_string(), 1);
                if let Some((k, _)) = model.entries.first() {
                    copy.remove(k.as_str());
                }
                prop_assert_eq!(sut.len(), model.entries.len());
                prop_assert!(!sut.contains_key("copy-only"));
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.entries.len());
        prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
        let order: Vec<(String, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&order, &model.entries);
        for c in &stale {
            prop_assert_eq!(c.get(sut), Err(Error::InvalidCursor(CursorFault::Stale)));
        }
        for (k, c) in &live {
            prop_assert_eq!(c.key(sut), Ok(k));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against an insertion-ordered model.
// After every operation:
// - the index and order list agree and respect the load-factor bound;
// - iteration order equals first-insertion order of the surviving keys;
// - cursors to live entries still resolve to their keys (across rehashes);
// - cursors to erased entries report `Stale`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: LinkedHashMap<String, i32> = LinkedHashMap::new();
        run(&mut sut, &pool, ops)?;
    }
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants with every key in one bucket chain, which
// stresses chain unlinking at head, middle and tail positions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: LinkedHashMap<String, i32, ConstBuildHasher> =
            LinkedHashMap::with_hasher(ConstBuildHasher);
        run(&mut sut, &pool, ops)?;
    }
}
