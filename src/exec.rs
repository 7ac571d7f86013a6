//! Script executor (component 4.G).
//!
//! Grounded in `httputils.c`'s `popen2`/`run_executable`: spawn the
//! configured interpreter on the script, feed it querystring and body on
//! stdin, half-close stdin, and read its stdout back as the response body.
//! Deviation from the original, recorded in §9: the child is reaped after
//! its output is read instead of left to become a zombie — `tokio::process`
//! makes that a single extra `.wait()` rather than new plumbing.

use crate::errors::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Read up to this many bytes of the child's stdout. A known bound
/// inherited from the original's fixed `MAX_BUFFER` (1024) — see §9.
const MAX_OUTPUT: usize = 1024;

/// `.py` -> `python`, `.php` -> `php`; anything else is not executable.
pub(crate) fn interpreter_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str())? {
        "py" => Some("python"),
        "php" => Some("php"),
        _ => None,
    }
}

/// Runs `interpreter script_path`, feeding `querystring` and `body` (each
/// followed by `\r\n`, each written only if present) to its stdin, then
/// reads up to [`MAX_OUTPUT`] bytes of stdout. Returns the bytes read on
/// success; an empty read is [`ErrorKind::ExecError`], matching the
/// original's "0 bytes read -> 500 Execution error" rule.
pub(crate) async fn run(
    interpreter: &str,
    script_path: &Path,
    querystring: Option<&[u8]>,
    body: Option<&[u8]>,
) -> Result<Vec<u8>, ErrorKind> {
    let mut child = Command::new(interpreter)
        .arg(script_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ErrorKind::ExecError)?;

    let mut stdin = child.stdin.take().ok_or(ErrorKind::InternalError)?;
    let mut input = Vec::new();
    if let Some(qs) = querystring {
        input.extend_from_slice(qs);
        input.extend_from_slice(b"\r\n");
    }
    if let Some(body) = body {
        input.extend_from_slice(body);
        input.extend_from_slice(b"\r\n");
    }
    if !input.is_empty() {
        let _ = stdin.write_all(&input).await;
    }
    drop(stdin); // half-close: signals EOF to the script

    let mut stdout = child.stdout.take().ok_or(ErrorKind::InternalError)?;
    let mut output = vec![0u8; MAX_OUTPUT];
    let mut total = 0;
    while total < output.len() {
        let n = stdout.read(&mut output[total..]).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        total += n;
    }
    output.truncate(total);

    let _ = child.wait().await;

    if output.is_empty() {
        return Err(ErrorKind::ExecError);
    }
    Ok(output)
}
