//! Log output of value changes, captured through a test subscriber.

use std::io::Write;
use std::sync::Arc;

use cascade_core::{Config, MapConfigSource, SECRET_MASK, SecretMaskingFilter};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn value_changes_are_logged_through_the_log_filter() {
    let captured = CapturedLog::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    let source = Arc::new(MapConfigSource::with_values(
        "m",
        100,
        [("db.password", "hunter2")],
    ));
    let config = Config::builder()
        .with_shared_source(source.clone())
        .with_filter(SecretMaskingFilter::new())
        .build()
        .unwrap();
    let mut password = config.resolve("db.password").log_changes(true);

    tracing::subscriber::with_default(subscriber, || {
        assert_eq!(password.get_value().unwrap().as_deref(), Some("hunter2"));
        source.set("db.password", "swordfish");
        assert_eq!(password.get_value().unwrap().as_deref(), Some("swordfish"));
        assert_eq!(password.get_value().unwrap().as_deref(), Some("swordfish"));
    });

    let output = captured.text();
    assert_eq!(output.matches("New value for key").count(), 2, "{output}");
    assert!(output.contains(SECRET_MASK));
    assert!(!output.contains("hunter2"));
    assert!(!output.contains("swordfish"));
}
