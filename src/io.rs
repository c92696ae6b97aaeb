use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::constants::Pid;
use crate::error::Result as MmuResult;
use crate::mmu::Mmu;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// One MMU operation from a trace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Alloc { pid: Pid, n: usize },
    Write { pid: Pid, va: usize, content: Vec<u8> },
    Read { pid: Pid, va: usize, n: usize },
    Free { pid: Pid, n: usize },
}

/// Outcome of replaying one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutput {
    Done,
    Bytes(Vec<u8>),
}

impl Op {
    pub fn apply(&self, mmu: &mut Mmu) -> MmuResult<OpOutput> {
        match self {
            Op::Alloc { pid, n } => mmu.alloc(*pid, *n).map(|_| OpOutput::Done),
            Op::Write { pid, va, content } => mmu.write(*pid, *va, content).map(|_| OpOutput::Done),
            Op::Read { pid, va, n } => mmu.read(*pid, *va, *n).map(OpOutput::Bytes),
            Op::Free { pid, n } => mmu.free(*pid, *n).map(|_| OpOutput::Done),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Alloc { pid, n } => write!(f, "alloc {} {}", pid, n),
            Op::Write { pid, va, content } => write!(f, "write {} {} ({} bytes)", pid, va, content.len()),
            Op::Read { pid, va, n } => write!(f, "read {} {} {}", pid, va, n),
            Op::Free { pid, n } => write!(f, "free {} {}", pid, n),
        }
    }
}

/// Render a replay result as a single output line
pub fn format_result(result: &MmuResult<OpOutput>) -> String {
    match result {
        Ok(OpOutput::Done) => "ok".to_string(),
        Ok(OpOutput::Bytes(bytes)) => format!("ok {}", String::from_utf8_lossy(bytes)),
        Err(e) => format!("error: {}", e),
    }
}

pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<Op>, TraceError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TraceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&content)
}

/// Parse a trace; blank lines and `#` comments are skipped
pub fn parse_trace(content: &str) -> Result<Vec<Op>, TraceError> {
    let mut ops = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op = parse_line(line.trim_start()).map_err(|message| TraceError::Parse {
            line: index + 1,
            message,
        })?;
        ops.push(op);
    }
    Ok(ops)
}

fn parse_line(line: &str) -> Result<Op, String> {
    let (command, rest) = split_token(line);
    match command {
        "alloc" => {
            let [pid, n] = fields::<2>(rest, command)?;
            Ok(Op::Alloc { pid: parse_pid(pid)?, n: parse_number(n, "size")? })
        }
        "read" => {
            let [pid, va, n] = fields::<3>(rest, command)?;
            Ok(Op::Read {
                pid: parse_pid(pid)?,
                va: parse_number(va, "address")?,
                n: parse_number(n, "size")?,
            })
        }
        "free" => {
            let [pid, n] = fields::<2>(rest, command)?;
            Ok(Op::Free { pid: parse_pid(pid)?, n: parse_number(n, "page count")? })
        }
        "write" => {
            let (pid, rest) = split_token(rest);
            let (va, text) = split_text(rest);
            if va.is_empty() {
                return Err("write expects <pid> <va> <text>".to_string());
            }
            Ok(Op::Write {
                pid: parse_pid(pid)?,
                va: parse_number(va, "address")?,
                content: text.as_bytes().to_vec(),
            })
        }
        other => Err(format!("unknown command: {}", other)),
    }
}

/// Split off the first whitespace-delimited token
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

/// Split off the address token; the text is everything after the single separator
fn split_text(s: &str) -> (&str, &str) {
    match s.char_indices().find(|&(_, c)| c.is_whitespace()) {
        Some((end, c)) => (&s[..end], &s[end + c.len_utf8()..]),
        None => (s, ""),
    }
}

fn fields<'a, const N: usize>(rest: &'a str, command: &str) -> Result<[&'a str; N], String> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    tokens
        .try_into()
        .map_err(|tokens: Vec<&str>| format!("{} expects {} arguments, got {}", command, N, tokens.len()))
}

fn parse_pid(token: &str) -> Result<Pid, String> {
    token.parse().map_err(|_| format!("invalid pid: {}", token))
}

fn parse_number(token: &str, what: &str) -> Result<usize, String> {
    token.parse().map_err(|_| format!("invalid {}: {}", what, token))
}

/// Replay `ops` against `mmu`, one result line per operation
pub fn replay(mmu: &mut Mmu, ops: &[Op]) -> Vec<String> {
    ops.iter()
        .map(|op| {
            let line = format_result(&op.apply(mmu));
            debug!("{} -> {}", op, line);
            line
        })
        .collect()
}

pub fn write_results<P: AsRef<Path>>(path: P, results: &[String]) -> Result<(), TraceError> {
    let path = path.as_ref();
    let mut content = results.join("\n");
    content.push('\n');
    fs::write(path, content).map_err(|source| TraceError::Write {
        path: path.to_path_buf(),
        source,
    })
}
