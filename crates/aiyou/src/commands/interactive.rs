//! Interactive command - multi-turn chat in one thread.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::Context;
use super::repl::{EditorSource, Repl};

/// Arguments for the interactive command.
#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Resume an existing thread
    #[arg(short, long)]
    pub thread: Option<String>,

    /// Directory for `/save` (default: `[transcript] dir`, else the working directory)
    #[arg(long)]
    pub transcript_dir: Option<PathBuf>,
}

/// Run the interactive command (REPL).
pub async fn run(args: InteractiveArgs, ctx: &Context) -> Result<()> {
    let instruction = ctx.instruction()?;
    let conn = ctx.connect().await?;
    let transcript_dir = args.transcript_dir.unwrap_or_else(|| ctx.transcript_dir());

    let mut repl = Repl::new(
        conn.client,
        conn.session,
        EditorSource::new()?,
        instruction,
        transcript_dir,
    )
    .with_thread(args.thread)
    .silent(ctx.silent);
    repl.run().await
}
