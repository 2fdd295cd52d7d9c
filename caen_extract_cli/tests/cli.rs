use std::process::Command;

fn caen_extract() -> Command {
    Command::new(env!("CARGO_BIN_EXE_caen_extract"))
}

// One legacy record for channel 1 with a = 3, b = 1
fn legacy_record() -> Vec<u8> {
    let mut bytes = vec![0u8; 20];
    bytes[4] = 10;
    bytes[10] = 1;
    bytes[12] = 3;
    bytes[14] = 1;
    bytes
}

#[test]
fn test_exit_status() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("run.dat");
    std::fs::write(&input, legacy_record())?;

    let status = caen_extract()
        .arg(&input)
        .args(["-c", "1", "--pivot", "2024-08-01", "-o"])
        .arg(dir.path())
        .status()?;
    assert!(status.success());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("run_channel_01.txt"))?,
        "     3\t     1\t 0.5000000000000\n"
    );

    let status = caen_extract()
        .arg(dir.path().join("missing.dat"))
        .status()?;
    assert_eq!(status.code(), Some(1));

    let status = caen_extract()
        .arg(&input)
        .args(["--pivot", "someday"])
        .status()?;
    assert_eq!(status.code(), Some(1));
    Ok(())
}

#[test]
fn test_failed_extraction_exits_non_zero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("partial.dat");
    let mut bytes = legacy_record();
    bytes.extend([0xff; 3]);
    std::fs::write(&input, bytes)?;

    let status = caen_extract()
        .arg(&input)
        .args(["-c", "1", "--pivot", "2024-08-01", "-o"])
        .arg(dir.path())
        .status()?;
    assert_eq!(status.code(), Some(1));

    let status = caen_extract()
        .arg(&input)
        .args(["-c", "1", "--pivot", "2024-08-01", "--allow-partial", "-o"])
        .arg(dir.path())
        .status()?;
    assert!(status.success());
    Ok(())
}
