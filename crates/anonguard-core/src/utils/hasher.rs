//! Hash maps for class tallies. Every row key is hashed at least twice per
//! run, so they use xxh3 instead of SipHash.

use std::collections::HashMap;

pub use xxhash_rust::xxh3::Xxh3DefaultBuilder as Xxh3Builder;

pub type Xxh3Map<K, V> = HashMap<K, V, Xxh3Builder>;

pub fn xxh3_map<K, V>(capacity: usize) -> Xxh3Map<K, V> {
    HashMap::with_capacity_and_hasher(capacity, Xxh3Builder::new())
}
