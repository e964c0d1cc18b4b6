//! SNI Policy Warning Tests
//!
//! A session that requests a virtual host without supporting SNI is still
//! resolved in the host's namespace; the mismatch is only logged.

use dtls_psk_core::resolver::resolve;
use dtls_psk_core::session::DtlsSession;
use dtls_psk_core::store::InMemoryPskStore;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

/// Layer keeping the level and message of every event.
#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

impl CaptureLayer {
    fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::WARN)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

fn peer() -> SocketAddr {
    "192.0.2.1:5684".parse().unwrap()
}

fn store() -> InMemoryPskStore {
    let store = InMemoryPskStore::new();
    store.add_known_peer(peer(), "plain");
    store.set_key("plain", vec![1]);
    store.add_known_peer_for_host(peer(), "a.example.com", "scoped");
    store.set_key_for_host("a.example.com", "scoped", vec![2]);
    store
}

fn with_capture<T>(f: impl FnOnce() -> T) -> (T, CaptureLayer) {
    let layer = CaptureLayer::default();
    let subscriber = Registry::default().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, layer)
}

/// Unsupported SNI warns but still resolves in the host's namespace.
#[test]
fn test_unsupported_sni_warns_and_proceeds() {
    let store = store();
    let session = DtlsSession::new(peer())
        .with_virtual_host("a.example.com")
        .unwrap()
        .with_sni_supported(false);

    let (result, capture) = with_capture(|| resolve(true, &session, &store));

    let credential = result.unwrap();
    assert_eq!(credential.identity().name(), "a.example.com:scoped");
    assert_eq!(credential.key().expose_secret(), &[2]);

    let warnings = capture.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("does not support"));
}

/// Supported SNI produces no warning.
#[test]
fn test_supported_sni_does_not_warn() {
    let store = store();
    let session = DtlsSession::new(peer())
        .with_virtual_host("a.example.com")
        .unwrap();

    let (result, capture) = with_capture(|| resolve(true, &session, &store));

    assert!(result.is_ok());
    assert!(capture.warnings().is_empty());
}

/// The warning is tied to the host-scoped path only.
#[test]
fn test_no_warning_when_sni_disabled() {
    let store = store();
    let session = DtlsSession::new(peer())
        .with_virtual_host("a.example.com")
        .unwrap()
        .with_sni_supported(false);

    let (result, capture) = with_capture(|| resolve(false, &session, &store));

    assert_eq!(result.unwrap().identity().name(), "plain");
    assert!(capture.warnings().is_empty());
}

/// Key bytes never reach the log output.
#[test]
fn test_secret_is_not_logged() {
    let store = InMemoryPskStore::new();
    store.add_known_peer(peer(), "client1");
    store.set_key("client1", b"very-secret-psk".to_vec());

    let (result, capture) = with_capture(|| {
        resolve(true, &DtlsSession::new(peer()), &store).map(|c| format!("{:?}", c))
    });

    let rendered = result.unwrap();
    assert!(!rendered.contains("very-secret-psk"));
    for (_, message) in capture.events.lock().unwrap().iter() {
        assert!(!message.contains("very-secret-psk"));
    }
}
