
use sourcelog::{mail::Mailer, Debugger, Facilities, Services};
use std::sync::Arc;
use test_utils::{config_in, Outbox};

fn debugger(dir: &std::path::Path, outbox: &Arc<Outbox>) -> Debugger {
    let config = config_in(dir).email_log_file_to("ops@example.com");
    let mailer: Arc<dyn Mailer> = Arc::clone(outbox) as Arc<dyn Mailer>;
    Debugger::new(
        config.into(),
        Services::default().mailer(mailer),
        // Info lines (start and end markers) do not pass
        Facilities::WARN | Facilities::FILE,
        Some("Nightly"),
    )
    .unwrap()
}

#[test]
fn test_log_file_is_mailed_once() {
    let dir = temp_dir::TempDir::new().unwrap();
    let outbox = Arc::new(Outbox::default());

    let mut debugger = debugger(dir.path(), &outbox);
    debugger.warn("disk at 91%").fail("backup failed");
    let log_file = debugger.log_file_path().unwrap().to_path_buf();
    debugger.shutdown();
    // teardown happens only once
    drop(debugger);

    let emails = outbox.emails();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "ops@example.com");
    assert!(emails[0].subject.starts_with("Debug log from: "));
    assert_eq!(emails[0].body, std::fs::read_to_string(log_file).unwrap());
    assert_eq!(emails[0].body.lines().count(), 2);
    assert!(emails[0].body.contains("disk at 91%"));
    assert!(emails[0].body.contains("backup failed"));
}

#[test]
fn test_empty_log_file_is_not_mailed() {
    let dir = temp_dir::TempDir::new().unwrap();
    let outbox = Arc::new(Outbox::default());

    let debugger = debugger(dir.path(), &outbox);
    drop(debugger);

    assert!(outbox.emails().is_empty());
}

#[test]
fn test_without_recipient_nothing_is_mailed() {
    let dir = temp_dir::TempDir::new().unwrap();
    let outbox = Arc::new(Outbox::default());
    let mailer: Arc<dyn Mailer> = Arc::clone(&outbox) as Arc<dyn Mailer>;

    let mut debugger = Debugger::new(
        config_in(dir.path()).into(),
        Services::default().mailer(mailer),
        Facilities::WARN | Facilities::FILE,
        Some("Nightly"),
    )
    .unwrap();
    debugger.warn("written to the file only");
    drop(debugger);

    assert!(outbox.emails().is_empty());
}
