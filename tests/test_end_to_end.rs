
use regex::Regex;
use sourcelog::{
    simple_format, Comparison, Debugger, DebuggerConfig, Facilities, Message, Services, Severity,
};
use test_utils::RecordingWriter;

fn debugger(level: Facilities) -> (Debugger, RecordingWriter) {
    let recorder = RecordingWriter::default();
    let mut debugger = Debugger::new(
        DebuggerConfig::default().into(),
        Services::default(),
        level,
        Some("Orders"),
    )
    .unwrap();
    debugger.logger_mut().add_writer(
        Box::new(recorder.clone()),
        Severity::Warn,
        Comparison::LessOrEqual,
    );
    (debugger, recorder)
}

#[test]
fn test_gate_and_writer_threshold() {
    let (mut debugger, recorder) = debugger(Facilities::INFO);

    debugger.info("x");
    assert!(recorder.lines().is_empty());

    debugger.warn("y");
    let texts = recorder.texts();
    assert_eq!(texts.len(), 1);
    let line_format =
        Regex::new(r"^\d{4}-\d{2}-\d{2}\t\d{2}:\d{2}:\d{2}\tWARN  \tOrders\ty$").unwrap();
    assert!(line_format.is_match(&texts[0]), "unexpected line {}", texts[0]);
}

#[test]
fn test_level_gate() {
    let (mut debugger, recorder) = debugger(Facilities::WARN);
    debugger.logger_mut().clear_writers();
    debugger.logger_mut().add_writer(
        Box::new(recorder.clone()),
        Severity::Trace,
        Comparison::LessOrEqual,
    );

    debugger
        .trace("trace")
        .info("info")
        .notice("notice")
        .warn("warn")
        .fail("error");
    recorder.validate_logs(&[("WARN", "Orders", "warn"), ("ERROR", "Orders", "error")]);
}

#[test]
fn test_destination_bits_do_not_affect_the_gate() {
    let (mut debugger, recorder) = debugger(Facilities::WARN | Facilities::EVENT);
    // no event store available: the event bit attaches nothing
    assert_eq!(debugger.logger().len(), 1);

    debugger.log("with destination bits", Facilities::WARN | Facilities::FILE);
    debugger.log("no severity", Facilities::FILE);
    recorder.validate_logs(&[("WARN", "Orders", "with destination bits")]);
}

#[test]
fn test_source_override_and_tokens() {
    let (mut debugger, recorder) = debugger(Facilities::TRACE);
    debugger.set_format(simple_format);

    debugger.warn(
        Message::new("{count} items for {customer}")
            .source("Billing")
            .token("count", 3)
            .token("customer", "ACME"),
    );
    debugger.warn("{unknown} stays");
    assert_eq!(
        recorder.texts(),
        vec![
            "WARN   Billing: 3 items for ACME".to_string(),
            "WARN   Orders: {unknown} stays".to_string(),
        ]
    );
    assert_eq!(debugger.source(), "Orders");
}

#[test]
fn test_set_and_pop_source() {
    let (mut debugger, recorder) = debugger(Facilities::TRACE);
    debugger.set_source("A").set_source("B");
    debugger.warn("in b");
    assert_eq!(debugger.pop_source(), Some("B".to_string()));
    debugger.warn("in a");
    assert_eq!(debugger.pop_source(), Some("A".to_string()));
    assert_eq!(debugger.source(), "Orders");

    recorder.validate_logs(&[("WARN", "B", "in b"), ("WARN", "A", "in a")]);
}

#[test]
fn test_translations() {
    let recorder = RecordingWriter::default();
    let config = DebuggerConfig::default()
        .translation("Orders.OrderShipped", "Bestellung {id} versandt")
        .translation("Failed", "Fehlgeschlagen");
    let services = Services::for_config(&config);
    let mut debugger =
        Debugger::new(config.into(), services, Facilities::TRACE, Some("Orders")).unwrap();
    debugger.logger_mut().add_writer(
        Box::new(recorder.clone()),
        Severity::Trace,
        Comparison::LessOrEqual,
    );

    debugger.info(Message::new("order shipped").token("id", 7));
    debugger.info(Message::new("failed").source("Payments"));
    debugger.info("no template");
    recorder.validate_logs(&[
        ("INFO", "Orders", "Bestellung 7 versandt"),
        ("INFO", "Payments", "Fehlgeschlagen"),
        ("INFO", "Orders", "no template"),
    ]);
}

#[test]
fn test_custom_comparison() {
    let (mut debugger, _) = debugger(Facilities::TRACE);
    let only_errors = RecordingWriter::default();
    debugger.logger_mut().add_writer(
        Box::new(only_errors.clone()),
        Severity::Error,
        Comparison::Equal,
    );
    let below_warn = RecordingWriter::default();
    debugger.logger_mut().add_writer(
        Box::new(below_warn.clone()),
        Severity::Warn,
        Comparison::Custom(|severity, threshold| severity.rank() > threshold.rank()),
    );

    debugger.fail("e").warn("w").info("i");
    only_errors.validate_logs(&[("ERROR", "Orders", "e")]);
    below_warn.validate_logs(&[("INFO", "Orders", "i")]);
}
