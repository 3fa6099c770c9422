#![cfg(unix)]

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use uuid::Uuid;

const PROMPT: &str = "Type your command: ";

#[test]
fn test_ctrl_c_exits_while_waiting_for_typed_input() {
    let memory = std::env::temp_dir().join(format!("ds_shutdown_{}.json", Uuid::new_v4()));
    let mut child = Command::new(env!("CARGO_BIN_EXE_ds-assistant"))
        .args(["--input", "keyboard", "--voice-command", ""])
        .arg("--memory-file")
        .arg(&memory)
        .env("DEEPSEEK_API_KEY", "sk-test")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Keep stdin open so the read stays blocked.
    let _stdin = child.stdin.take().unwrap();
    let mut stdout = child.stdout.take().unwrap();

    let mut prompt = vec![0u8; PROMPT.len()];
    stdout.read_exact(&mut prompt).unwrap();
    assert_eq!(String::from_utf8(prompt).unwrap(), PROMPT);
    std::thread::sleep(Duration::from_millis(300));

    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("process still running 10s after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(status.success(), "exit status {:?}", status);
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(rest.contains("Voice-controlled DS stopped by user."), "stdout: {:?}", rest);
    let _ = std::fs::remove_file(&memory);
}
