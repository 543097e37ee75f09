//! Rendering pipeline
//!
//! notation text -> [notation stage] -> [document stage] -> [viewer]
//!
//! Stages are started in chain order: notation stage first, viewer last.
//! This is the reverse of a viewer-first launch, where the viewer is started
//! before the converters that feed it. Here each stage's stdout is handed
//! straight to the next stage's stdin, so every consumer is spawned with its
//! input already attached and the orchestrator holds only the first stage's
//! input. Lifecycle:
//! 1. Spawn notation, document, viewer
//! 2. Write the notation bytes, close the first input
//! 3. Wait for the notation stage, then the document stage
//! 4. The viewer sees end of input once the document stage exits
//!
//! Converter exit statuses are checked; the first failing stage in chain
//! order is reported. The viewer is left running unless configured
//! otherwise.

use crate::error::{Result, TunesError};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tunes_common::config::{CommandSpec, RenderConfig};

const NOTATION_STAGE: &str = "notation";
const DOCUMENT_STAGE: &str = "document";
const VIEWER_STAGE: &str = "viewer";

/// Displays a notation text
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, notation: &str) -> Result<()>;
}

/// Three-process conversion chain ending in a document viewer
pub struct RenderPipeline {
    config: RenderConfig,
}

impl RenderPipeline {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Renderer for RenderPipeline {
    async fn render(&self, notation: &str) -> Result<()> {
        let mut notation_stage = spawn_stage(
            NOTATION_STAGE,
            &self.config.notation_to_intermediate,
            Stdio::piped(),
            Stdio::piped(),
            true,
        )?;
        let intermediate = take_stdout(NOTATION_STAGE, &mut notation_stage)?;

        let mut document_stage = spawn_stage(
            DOCUMENT_STAGE,
            &self.config.intermediate_to_document,
            intermediate,
            Stdio::piped(),
            true,
        )?;
        let document = take_stdout(DOCUMENT_STAGE, &mut document_stage)?;

        let mut viewer = spawn_stage(
            VIEWER_STAGE,
            &self.config.viewer,
            document,
            Stdio::inherit(),
            false,
        )?;

        let mut input = notation_stage.stdin.take().ok_or_else(|| {
            TunesError::InvariantViolation(format!("{} stage stdin not captured", NOTATION_STAGE))
        })?;
        match input.write_all(notation.as_bytes()).await {
            // The stage died early; its exit status below says why
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::warn!(
                    stage = NOTATION_STAGE,
                    "Stage closed its input before all notation was written"
                );
            }
            other => other?,
        }
        drop(input);
        tracing::debug!(bytes = notation.len(), "Notation written");

        let notation_status = notation_stage.wait().await?;
        let document_status = document_stage.wait().await?;
        check_status(NOTATION_STAGE, notation_status)?;
        check_status(DOCUMENT_STAGE, document_status)?;

        if self.config.wait_for_viewer {
            let viewer_status = viewer.wait().await?;
            check_status(VIEWER_STAGE, viewer_status)?;
        } else {
            tracing::debug!(pid = ?viewer.id(), "Viewer left running");
        }

        Ok(())
    }
}

/// Start one stage. The `Command` is dropped on return, which releases this
/// process's copies of the stdio handles passed in.
///
/// Converters are spawned with `kill_on_drop` so a render that bails out
/// does not leave them behind; the viewer outlives the render.
fn spawn_stage(
    name: &str,
    command: &CommandSpec,
    stdin: Stdio,
    stdout: Stdio,
    kill_on_drop: bool,
) -> Result<Child> {
    let (program, args) = command.split()?;
    tracing::debug!(stage = name, command = %command, "Starting stage");

    let child = Command::new(program)
        .args(args)
        .stdin(stdin)
        .stdout(stdout)
        .kill_on_drop(kill_on_drop)
        .spawn()?;
    Ok(child)
}

fn take_stdout(name: &str, child: &mut Child) -> Result<Stdio> {
    let stdout = child.stdout.take().ok_or_else(|| {
        TunesError::InvariantViolation(format!("{} stage stdout not captured", name))
    })?;
    let stdio: Stdio = stdout.try_into()?;
    Ok(stdio)
}

fn check_status(name: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(TunesError::ConversionFailed {
            stage: name.to_string(),
            status: status.to_string(),
        })
    }
}
