use rhub_logger::{Logger, LoggerError, LoggerErrorExt};

#[test]
fn only_one_global_subscriber_may_be_installed() {
    let _keepalive = Logger::builder()
        .name("rhub-first")
        .init()
        .expect("first install must succeed");

    let second = Logger::builder().name("rhub-second").init();
    let Err(err) = second else {
        panic!("a second install must be refused while the first is active");
    };

    assert!(matches!(err, LoggerError::Subscriber { .. }));

    // Context attachment keeps working on the already-built error.
    let err = Err::<(), _>(err).context("during test bootstrap").unwrap_err();
    assert!(err.to_string().contains("during test bootstrap"));
}
