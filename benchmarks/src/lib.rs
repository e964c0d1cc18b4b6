//! Fixtures shared by the PSK benchmarks.

use dtls_psk_core::store::InMemoryPskStore;
use std::net::SocketAddr;

/// Distinct peer address for index `i`.
pub fn peer(i: u32) -> SocketAddr {
    SocketAddr::from(([10, (i >> 16) as u8, (i >> 8) as u8, i as u8], 5684))
}

/// Virtual host that peer `i` is registered under.
pub fn host(i: u32) -> String {
    format!("h{}.example.com", i % 64)
}

/// Store with `size` peers, each known in the default namespace and in one
/// of 64 virtual hosts.
pub fn populated_store(size: u32) -> InMemoryPskStore {
    let store = InMemoryPskStore::new();
    for i in 0..size {
        store.add_known_peer(peer(i), format!("plain{}", i));
        store.set_key(format!("plain{}", i), vec![i as u8; 16]);
        store.add_known_peer_for_host(peer(i), &host(i), format!("scoped{}", i));
        store.set_key_for_host(&host(i), format!("scoped{}", i), vec![i as u8; 32]);
    }
    store
}
