use ironbrc::testing::*;
use ironbrc::{compute, ExecMode, RecordError, RunConfig, Runner, ValueError};

const MODES: [ExecMode; 3] = [ExecMode::Sequential, ExecMode::Streaming, ExecMode::InMemory];

fn runner(mode: ExecMode) -> Runner {
    Runner::new(
        mode,
        RunConfig::default().with_workers(3).with_block_size(32),
    )
}

#[test]
fn malformed_value_is_a_record_error() {
    let input = "a;1.0\nb;2.0\nc;3.25\nd;4.0\n";
    for mode in MODES {
        let err = runner(mode).run(input.as_bytes()).unwrap_err();
        let record = err
            .downcast_ref::<RecordError>()
            .unwrap_or_else(|| panic!("{mode:?}: expected RecordError, got {err:#}"));
        assert!(
            matches!(
                record,
                RecordError::InvalidValue {
                    source: ValueError::FractionDigits(2),
                    ..
                }
            ),
            "{mode:?}: {record:?}"
        );
    }
}

#[test]
fn missing_delimiter_aborts_a_large_run() {
    let mut input = MeasurementBuilder::new().keys(20).records(5_000).seed(1).build();
    input.push_str("garbage line\n");
    input.push_str(&MeasurementBuilder::new().records(5_000).seed(2).build());

    let err = runner(ExecMode::Streaming).run(input.as_bytes()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RecordError>(),
        Some(RecordError::MissingDelimiter { .. })
    ));
    assert!(format!("{err:#}").contains("parse chunk #"));
}

#[test]
fn error_in_last_unterminated_record() {
    let err = runner(ExecMode::Streaming)
        .run("a;1.0\nb;2".as_bytes())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RecordError>(),
        Some(RecordError::InvalidValue {
            source: ValueError::MissingPoint,
            ..
        })
    ));
}

#[test]
fn source_failure_is_fatal() {
    let data = MeasurementBuilder::new().records(500).build();
    for mode in MODES {
        let err = runner(mode)
            .run(FailingReader::new(data.as_bytes()))
            .unwrap_err();
        assert!(
            err.downcast_ref::<std::io::Error>().is_some(),
            "{mode:?}: {err:#}"
        );
        assert!(err.downcast_ref::<RecordError>().is_none());
    }
}

#[test]
fn nothing_is_written_on_failure() {
    let mut out = Vec::new();
    let result = compute("a;1.0\nb;oops\n".as_bytes(), &mut out);
    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn value_beyond_i64_tenths_is_an_overflow_error() {
    let input = "k;1.0\nk;922337203685477580.8\n";
    for mode in MODES {
        let err = runner(mode).run(input.as_bytes()).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<RecordError>(),
                Some(RecordError::InvalidValue {
                    source: ValueError::Overflow,
                    ..
                })
            ),
            "{mode:?}: {err:#}"
        );
    }
}
