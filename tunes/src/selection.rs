//! Selection protocol
//!
//! One round: render the candidates as menu lines, hand them to the picker,
//! decode its reply.
//!
//! Picker contract (rofi/dmenu with `-format i:s`):
//! - Menu lines arrive on stdin, one candidate per line, in list order
//! - Non-zero exit means the user cancelled; the code is propagated as-is
//! - On success stdout is `<index>:<text>`; a negative index means the user
//!   typed free text instead of picking a line

use crate::error::{Result, TunesError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tunes_common::config::{CommandSpec, PickerConfig, PROMPT_PLACEHOLDER};
use tunes_common::{Tune, TuneSetting};

/// Exit code used when the picker was terminated by a signal
const SIGNALLED_EXIT_CODE: i32 = 1;

/// Raw result of running the picker once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerReply {
    /// Exit code; `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
}

impl PickerReply {
    /// Successful reply carrying `stdout`
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
        }
    }

    /// Cancelled reply with the given exit code
    pub fn cancelled(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
        }
    }
}

/// Decoded picker reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// Index into the rendered candidate list
    Selected(usize),
    /// Free text typed instead of a pick
    Requery(String),
    /// Picker exited non-zero with this code
    Cancelled(i32),
}

/// Result of a tune round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunePick {
    Selected(Tune),
    /// Search again with this text
    Requery(String),
    Cancelled(i32),
}

/// Result of a setting round (free text is an error here, not a requery)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingPick {
    Selected(TuneSetting),
    Cancelled(i32),
}

/// External interactive line picker
#[async_trait]
pub trait Picker: Send + Sync {
    /// Show `menu` (newline-joined lines) under `prompt` and wait for the user
    async fn pick(&self, prompt: &str, menu: &str) -> Result<PickerReply>;
}

/// Picker backed by an external command such as rofi or dmenu
pub struct CommandPicker {
    command: CommandSpec,
}

impl CommandPicker {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Picker for CommandPicker {
    async fn pick(&self, prompt: &str, menu: &str) -> Result<PickerReply> {
        let command = self.command.substitute(PROMPT_PLACEHOLDER, prompt);
        let (program, args) = command.split()?;
        tracing::debug!(command = %command, "Launching picker");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A picker may exit without reading the whole menu
            match stdin.write_all(menu.as_bytes()).await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("Picker closed its input early");
                }
                other => other?,
            }
        }

        let output = child.wait_with_output().await?;
        Ok(PickerReply {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Menu line for a tune: `<marker> <name> [<type>]`
pub fn format_tune(marker: &str, tune: &Tune) -> String {
    format!(
        "{} {} [{}]",
        marker,
        single_line(&tune.name),
        single_line(&tune.tune_type)
    )
}

/// Menu line for a setting: `<marker> (<id>) <key> <meter>`
///
/// Absent fields render as empty text.
pub fn format_setting(marker: &str, setting: &TuneSetting) -> String {
    format!(
        "{} ({}) {} {}",
        marker,
        single_line(setting.id.as_deref().unwrap_or_default()),
        single_line(setting.key.as_deref().unwrap_or_default()),
        single_line(setting.meter.as_deref().unwrap_or_default())
    )
}

/// Collapse every whitespace run (line breaks included) to one space.
/// Menu line N must be record N, so no field may span lines.
fn single_line(field: &str) -> String {
    field.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Newline-joined menu for a tune round, in list order
pub fn render_tunes(marker: &str, tunes: &[Tune]) -> String {
    tunes
        .iter()
        .map(|tune| format_tune(marker, tune))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Newline-joined menu for a setting round, in list order
pub fn render_settings(marker: &str, settings: &[TuneSetting]) -> String {
    settings
        .iter()
        .map(|setting| format_setting(marker, setting))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a picker reply against a menu of `len` entries
///
/// A non-negative index must address one of the `len` entries; anything
/// else means picker and list are out of sync.
pub fn decode_reply(reply: &PickerReply, len: usize) -> Result<PickOutcome> {
    match reply.code {
        Some(0) => {}
        Some(code) => return Ok(PickOutcome::Cancelled(code)),
        None => return Ok(PickOutcome::Cancelled(SIGNALLED_EXIT_CODE)),
    }

    let line = reply.stdout.trim_end_matches(['\n', '\r']);
    let (index, text) = line.split_once(':').ok_or_else(|| {
        TunesError::PickerProtocol(format!("expected '<index>:<text>', got {:?}", line))
    })?;
    let index: i64 = index.trim().parse().map_err(|_| {
        TunesError::PickerProtocol(format!("index is not an integer: {:?}", index))
    })?;

    if index < 0 {
        return Ok(PickOutcome::Requery(text.to_string()));
    }

    match usize::try_from(index) {
        Ok(index) if index < len => Ok(PickOutcome::Selected(index)),
        _ => Err(TunesError::InvariantViolation(format!(
            "picker returned index {} for a menu of {} entries",
            index, len
        ))),
    }
}

/// Run one tune round
pub async fn select_tune<P: Picker + ?Sized>(
    picker: &P,
    config: &PickerConfig,
    tunes: &[Tune],
) -> Result<TunePick> {
    let menu = render_tunes(&config.tune_marker, tunes);
    tracing::debug!(entries = tunes.len(), "Tune menu");
    let reply = picker.pick(&config.tune_prompt, &menu).await?;

    Ok(match decode_reply(&reply, tunes.len())? {
        PickOutcome::Selected(index) => TunePick::Selected(tunes[index].clone()),
        PickOutcome::Requery(text) => TunePick::Requery(text),
        PickOutcome::Cancelled(code) => TunePick::Cancelled(code),
    })
}

/// Run one setting round
///
/// Typed free text fails with [`TunesError::NoSettingSelected`].
pub async fn select_setting<P: Picker + ?Sized>(
    picker: &P,
    config: &PickerConfig,
    settings: &[TuneSetting],
) -> Result<SettingPick> {
    let menu = render_settings(&config.setting_marker, settings);
    tracing::debug!(entries = settings.len(), "Setting menu");
    let reply = picker.pick(&config.setting_prompt, &menu).await?;

    match decode_reply(&reply, settings.len())? {
        PickOutcome::Selected(index) => Ok(SettingPick::Selected(settings[index].clone())),
        PickOutcome::Requery(_) => Err(TunesError::NoSettingSelected),
        PickOutcome::Cancelled(code) => Ok(SettingPick::Cancelled(code)),
    }
}
