//! Interactive prompts for the command line.
//!
//! Prompts read from any `BufRead` and write to any `Write`, so the binary passes
//! stdin/stdout and tests pass in-memory buffers.

use std::future::Future;
use std::io::{BufRead, Write};

use crate::credential::{is_credential_char, Credential};
use crate::{HuddleError, Result};

/// Lowest port the hub may be started on.
pub const MIN_PORT: u16 = 1024;

/// Longest input still treated as a credential.
pub const MAX_CREDENTIAL_LEN: usize = 12;

/// What the operator chose at the port prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortChoice {
    /// Host a hub on this port.
    Host(u16),
    /// The port is taken; join the hub already running there.
    Join(u16),
}

/// Where the terminal peer should connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Host name or IP address.
    pub host: String,
    /// Hub port.
    pub port: u16,
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(HuddleError::Validation("input closed".to_string()));
    }
    Ok(line.trim().to_string())
}

/// Parse a hub port typed by the operator.
pub fn parse_port(text: &str) -> Result<u16> {
    let port: u32 = text
        .parse()
        .map_err(|_| HuddleError::Validation("Please enter a valid number.".to_string()))?;
    match u16::try_from(port) {
        Ok(port) if port >= MIN_PORT => Ok(port),
        _ => Err(HuddleError::Validation(format!(
            "Please enter a port number between {MIN_PORT} and 65535."
        ))),
    }
}

/// Ask for the hub port until the operator picks a free one or opts to join.
///
/// `in_use` reports whether a port is already taken.
pub async fn choose_port<R, W, F, Fut>(
    input: &mut R,
    output: &mut W,
    default_port: u16,
    in_use: F,
) -> Result<PortChoice>
where
    R: BufRead,
    W: Write,
    F: Fn(u16) -> Fut,
    Fut: Future<Output = bool>,
{
    loop {
        let answer = read_answer(
            input,
            output,
            &format!("Enter port to use (default {default_port}): "),
        )?;
        let port = if answer.is_empty() {
            default_port
        } else {
            match parse_port(&answer) {
                Ok(port) => port,
                Err(HuddleError::Validation(msg)) => {
                    writeln!(output, "{msg}")?;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        if !in_use(port).await {
            return Ok(PortChoice::Host(port));
        }

        writeln!(output, "Port {port} is already in use.")?;
        if confirm_join(input, output)? {
            return Ok(PortChoice::Join(port));
        }
        writeln!(output, "Try another port.")?;
    }
}

/// Ask whether to join the hub on a busy port instead of hosting.
pub fn confirm_join<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    let answer = read_answer(
        input,
        output,
        "Do you want to join as a client instead? (y/n): ",
    )?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

/// Whether operator input looks like a credential rather than an address.
///
/// `localhost` is alphanumeric and short enough to decode, so it is excluded by name.
pub fn looks_like_credential(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= MAX_CREDENTIAL_LEN
        && !text.eq_ignore_ascii_case("localhost")
        && text.chars().all(is_credential_char)
}

/// Ask for a credential or an address (and then a port).
pub fn read_target<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default_port: u16,
) -> Result<Target> {
    let mut answer = read_answer(
        input,
        output,
        "Enter connection password (encoded IP+port) OR IP (e.g. 192.168.x.x or localhost): ",
    )?;
    if answer.is_empty() {
        answer = "localhost".to_string();
    }

    if looks_like_credential(&answer) {
        match Credential::decode(&answer) {
            Ok(credential) => {
                writeln!(
                    output,
                    "Decoded password to IP: {}, port: {}",
                    credential.ip(),
                    credential.port()
                )?;
                return Ok(Target {
                    host: credential.ip().to_string(),
                    port: credential.port(),
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "input is not a credential");
            }
        }
    }

    let port_answer = read_answer(
        input,
        output,
        &format!("Enter server port (default {default_port}): "),
    )?;
    let port = port_answer.parse().unwrap_or(default_port);

    Ok(Target { host: answer, port })
}
