//! Renderer Actor: Dedicated thread for writing frames to the terminal.
//!
//! The UI loop renders each frame into an owned [`Buffer`] and hands it over
//! by value. This actor keeps the frame currently on screen, diffs the new
//! one against it, and flushes the resulting ANSI in a single write.

use super::messages::RenderCommand;
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Render statistics, logged at shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    /// Frames written.
    pub frames: u64,
    /// Frames that needed a full redraw.
    pub full_redraws: u64,
    /// Bytes written to the terminal.
    pub bytes_written: u64,
    /// Smoothed render time in microseconds.
    pub avg_render_us: u64,
}

/// Frame writer: the displayed frame plus the diff state against it.
pub struct Renderer<W> {
    /// Frame on screen; `None` before the first frame.
    current: Option<Buffer>,
    diff_state: DiffState,
    /// Pre-allocated output buffer.
    output: Vec<u8>,
    out: W,
    stats: RenderStats,
}

impl<W: Write> Renderer<W> {
    /// A renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            current: None,
            diff_state: DiffState::new(),
            output: Vec::with_capacity(64 * 1024),
            out,
            stats: RenderStats::default(),
        }
    }

    /// Show `next`, redrawing fully when the size changed.
    pub fn present(&mut self, next: Buffer) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();
        self.output.extend_from_slice(b"\x1b[?25l");

        match &self.current {
            Some(current)
                if current.width() == next.width() && current.height() == next.height() =>
            {
                render_diff(current, &next, &mut self.output, &mut self.diff_state);
            }
            _ => {
                render_full(&next, &mut self.output);
                self.diff_state.reset();
                self.stats.full_redraws += 1;
            }
        }

        self.out.write_all(&self.output)?;
        self.out.flush()?;
        self.current = Some(next);

        let elapsed = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.avg_render_us = if self.stats.avg_render_us == 0 {
            elapsed
        } else {
            (self.stats.avg_render_us * 15 + elapsed) / 16
        };
        Ok(())
    }

    /// Statistics so far.
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The writer.
    pub const fn writer(&self) -> &W {
        &self.out
    }
}

/// Handle to the render thread.
pub struct RendererActor {
    handle: Option<JoinHandle<()>>,
}

impl RendererActor {
    /// Spawn the render thread writing to stdout.
    pub fn spawn(receiver: Receiver<RenderCommand>) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("tmail-render".to_string())
            .spawn(move || {
                let mut renderer = Renderer::new(io::stdout());
                if let Err(e) = run_loop(&receiver, &mut renderer) {
                    tracing::error!(error = %e, "render thread failed");
                }
                let stats = renderer.stats();
                tracing::debug!(
                    frames = stats.frames,
                    full_redraws = stats.full_redraws,
                    bytes = stats.bytes_written,
                    avg_render_us = stats.avg_render_us,
                    "render actor stopped"
                );
            })?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Apply commands until `Shutdown` or until every sender is gone.
///
/// Frames queued behind the one being applied are skipped; only the newest
/// one is drawn.
fn run_loop<W: Write>(receiver: &Receiver<RenderCommand>, renderer: &mut Renderer<W>) -> io::Result<()> {
    while let Ok(command) = receiver.recv() {
        let mut latest = match command {
            RenderCommand::Update(frame) => frame,
            RenderCommand::Shutdown => return Ok(()),
        };
        let mut shutdown = false;
        for queued in receiver.try_iter() {
            match queued {
                RenderCommand::Update(frame) => latest = frame,
                RenderCommand::Shutdown => {
                    shutdown = true;
                    break;
                }
            }
        }
        renderer.present(*latest)?;
        if shutdown {
            return Ok(());
        }
    }
    Ok(())
}
