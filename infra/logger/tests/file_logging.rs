use rhub_logger::{LevelFilter, Logger, Rotation};
use std::fs;
use tempfile::tempdir;

#[test]
fn file_layer_writes_to_a_rolling_log() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log_dir = dir.path().join("var").join("log");

    let logger = Logger::builder()
        .name("rhub-file-test")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&log_dir)
        .rotation(Rotation::NEVER)
        .max_files(3)
        .init()?;

    tracing::info!(item = "umbrella-42", "item registered");
    tracing::warn!("storage nearly full");

    // Dropping the handle releases the worker guard and flushes the writer.
    drop(logger);

    // With Rotation::NEVER the file name is exactly prefix.suffix.
    let log_file = log_dir.join("rhub-file-test.log");
    let contents = fs::read_to_string(&log_file)?;
    assert!(contents.contains("item registered"), "missing info line: {contents}");
    assert!(contents.contains("storage nearly full"), "missing warn line: {contents}");

    Ok(())
}
