//! Client PSK Key Exchange Tests
//!
//! End-to-end checks of credential resolution feeding the key exchange:
//! - ClientKeyExchange identity and premaster secret for both SNI modes
//! - Aborts always carry a fatal alert without resolution details
//! - Server side decoding of the announced identity

use dtls_psk::key_exchange::{
    compute_premaster_secret, decode_psk_identity, ClientPskKeyExchange, HandshakeAbort,
    OtherSecret,
};
use dtls_psk::session::DtlsSession;
use dtls_psk::store::{InMemoryPskStore, PskStore, StaticPskStore};
use dtls_psk::{ClientConfig, Error, PreSharedKey, PskIdentity};
use std::net::SocketAddr;
use std::sync::Arc;

fn peer() -> SocketAddr {
    "10.0.0.5:5684".parse().unwrap()
}

fn store() -> InMemoryPskStore {
    let store = InMemoryPskStore::new();
    store.add_known_peer(peer(), "client1");
    store.set_key("client1", vec![0xAA, 0xBB]);
    store.add_known_peer_for_host(peer(), "a.example.com", "idA");
    store.set_key_for_host("a.example.com", "idA", vec![0x01, 0x02, 0x03]);
    store
}

fn sni_config() -> ClientConfig {
    ClientConfig::builder().with_sni(true).build().unwrap()
}

#[test]
fn test_plain_psk_without_sni() {
    let config = ClientConfig::default();
    let exchange = ClientPskKeyExchange::new(&config)
        .negotiate(&DtlsSession::new(peer()), &store(), OtherSecret::Zeros)
        .unwrap();

    assert_eq!(exchange.principal(), &PskIdentity::host_agnostic("client1"));
    assert_eq!(exchange.client_key_exchange(), b"\x00\x07client1");
    assert_eq!(
        exchange.premaster_secret(),
        &[0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0xAA, 0xBB]
    );
}

#[test]
fn test_host_scoped_psk() {
    let session = DtlsSession::new(peer())
        .with_virtual_host("a.example.com")
        .unwrap();
    let exchange = ClientPskKeyExchange::new(&sni_config())
        .negotiate(&session, &store(), OtherSecret::Zeros)
        .unwrap();

    assert_eq!(exchange.principal().name(), "a.example.com:idA");
    // the host scope is not part of the identity on the wire
    assert_eq!(exchange.client_key_exchange(), b"\x00\x03idA");
    assert_eq!(
        exchange.premaster_secret(),
        &[0, 3, 0, 0, 0, 0, 3, 0x01, 0x02, 0x03]
    );
}

#[test]
fn test_sni_enabled_without_host() {
    let exchange = ClientPskKeyExchange::new(&sni_config())
        .negotiate(&DtlsSession::new(peer()), &store(), OtherSecret::Zeros)
        .unwrap();

    assert_eq!(exchange.principal().name(), ":client1");
    assert_eq!(exchange.client_key_exchange(), b"\x00\x07client1");
}

#[test]
fn test_ecdhe_psk() {
    let shared_secret = [0x5a; 32];
    let exchange = ClientPskKeyExchange::new(&ClientConfig::default())
        .negotiate(
            &DtlsSession::new(peer()),
            &store(),
            OtherSecret::Ecdhe(&shared_secret),
        )
        .unwrap();

    let premaster = exchange.into_premaster_secret();
    assert_eq!(premaster.len(), 2 + 32 + 2 + 2);
    assert_eq!(&premaster[..2], &[0x00, 0x20]);
    assert_eq!(&premaster[2..34], &shared_secret);
    assert_eq!(&premaster[34..], &[0x00, 0x02, 0xAA, 0xBB]);
}

#[test]
fn test_resolution_failures_look_identical_on_the_wire() {
    let config = sni_config();
    let kx = ClientPskKeyExchange::new(&config);
    let store = store();

    // unknown host: identity lookup fails
    let unknown_host = DtlsSession::new(peer())
        .with_virtual_host("b.example.com")
        .unwrap();
    // known identity without key
    store.add_known_peer_for_host(peer(), "c.example.com", "idC");
    let missing_key = DtlsSession::new(peer())
        .with_virtual_host("c.example.com")
        .unwrap();
    // unknown peer in the default namespace
    let unknown_peer = DtlsSession::new("10.0.0.6:5684".parse().unwrap());

    let mut wire = Vec::new();
    for session in [&unknown_host, &missing_key, &unknown_peer] {
        let abort = kx.negotiate(session, &store, OtherSecret::Zeros).unwrap_err();
        assert!(matches!(abort, HandshakeAbort::Resolution(_)));
        wire.push(abort.wire_alert());
    }
    assert!(wire.iter().all(|alert| *alert == [2, 40]));
}

#[test]
fn test_abort_keeps_local_diagnostic() {
    let session = DtlsSession::new(peer())
        .with_virtual_host("b.example.com")
        .unwrap();
    let abort = ClientPskKeyExchange::new(&sni_config())
        .negotiate(&session, &store(), OtherSecret::Zeros)
        .unwrap_err();

    assert_eq!(
        abort.to_string(),
        "No Identity found for peer [address: 10.0.0.5:5684, virtual host: b.example.com]"
    );
    assert!(std::error::Error::source(&abort).is_some());

    let err: Error = match abort {
        HandshakeAbort::Resolution(failure) => failure.into(),
        HandshakeAbort::Local(err) => err,
    };
    assert!(matches!(err, Error::HandshakeFailure(_)));
}

#[test]
fn test_identity_over_limit_aborts_with_internal_error() {
    let store = StaticPskStore::new("x".repeat(200), b"secretPSK".to_vec());
    let abort = ClientPskKeyExchange::new(&ClientConfig::default())
        .negotiate(&DtlsSession::new(peer()), &store, OtherSecret::Zeros)
        .unwrap_err();

    assert!(matches!(abort, HandshakeAbort::Local(Error::InvalidConfig(_))));
    assert_eq!(abort.wire_alert(), [2, 80]);

    let config = ClientConfig::builder()
        .with_max_psk_identity_length(256)
        .build()
        .unwrap();
    assert!(ClientPskKeyExchange::new(&config)
        .negotiate(&DtlsSession::new(peer()), &store, OtherSecret::Zeros)
        .is_ok());
}

/// The server recovers the identity and derives the same premaster secret.
#[test]
fn test_server_derives_same_premaster() {
    let store: Arc<dyn PskStore> = Arc::new(store());
    let session = DtlsSession::new(peer())
        .with_virtual_host("a.example.com")
        .unwrap();
    let config = sni_config();

    let exchange = ClientPskKeyExchange::new(&config)
        .negotiate(&session, &store, OtherSecret::Zeros)
        .unwrap();

    let identity = decode_psk_identity(
        exchange.client_key_exchange(),
        config.config.max_psk_identity_length,
    )
    .unwrap();
    assert_eq!(identity, "idA");

    let names = dtls_psk::server_names::ServerNames::from_host_name("a.example.com").unwrap();
    let server_key: PreSharedKey = store.key_for_host(&names, &identity).unwrap();
    let server_premaster = compute_premaster_secret(server_key, OtherSecret::Zeros).unwrap();

    assert_eq!(server_premaster.as_slice(), exchange.premaster_secret());
}
