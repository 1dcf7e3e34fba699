use printwatch_core::config::NotifyConfig;
use printwatch_core::diff::parse_tolerance;
use printwatch_core::errors::{ExError, ExErrorKind, PrintwatchError};

#[test]
fn test_bad_tolerance_verifiable_by_kind() {
    let err = parse_tolerance("bed_temper=1.0").unwrap_err();
    assert!(matches!(err, PrintwatchError::InvalidTolerance { .. }));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidTolerance);
    assert_eq!(ex_err.code(), "ERR_INVALID_TOLERANCE");
    assert!(ex_err.message().contains("bed_temper=1.0"));
}

#[test]
fn test_config_errors_map_to_invalid_config() {
    let config = NotifyConfig {
        report_percentages: vec![25, 250],
        ..NotifyConfig::default()
    };

    let ex_err: ExError = config.resolve().unwrap_err().into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(ex_err.op(), Some("resolve_config"));
}

#[test]
fn test_channel_closed_is_concurrency() {
    let ex_err: ExError = PrintwatchError::ChannelClosed.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Concurrency);
    assert_eq!(ex_err.code(), "ERR_CONCURRENCY");
}

#[test]
fn test_display_includes_operation() {
    let ex_err: ExError = PrintwatchError::CheckpointCorrupt {
        path: "/tmp/state.json".to_string(),
        reason: "EOF while parsing".to_string(),
    }
    .into();

    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_PERSISTENCE]"));
    assert!(rendered.contains("load_checkpoint"));
    assert!(rendered.contains("/tmp/state.json"));
}
