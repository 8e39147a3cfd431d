use std::io;
use std::sync::{Arc, Mutex};

use common_security::{ensure_capability, Capability, Role, SessionUser};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured(f: impl FnOnce()) -> String {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn denied_capability_logs_one_warning() {
    let clerk = SessionUser { user_id: 3, username: "clerk1".into(), role: Role::Clerk, email: None };
    let text = captured(|| {
        assert!(ensure_capability(&clerk, Capability::UserAdmin).is_err());
    });
    let warnings: Vec<&str> = text.lines().filter(|l| l.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "log was: {text}");
    assert!(warnings[0].contains("capability_check_failed"));
    assert!(warnings[0].contains("user_admin"));
}

#[test]
fn granted_capability_logs_nothing() {
    let manager = SessionUser { user_id: 2, username: "manager1".into(), role: Role::Manager, email: None };
    let text = captured(|| {
        assert!(ensure_capability(&manager, Capability::ReportsView).is_ok());
    });
    assert!(text.trim().is_empty(), "log was: {text}");
}
