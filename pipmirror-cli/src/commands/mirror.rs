//! Mirror command - capture one source into the preview

use anyhow::{bail, Context, Result};
use clap::Args;
use pipmirror_core::catalog::{SourceCatalog, TargetEntry, TargetList};
use pipmirror_core::config::{ConfigFile, QUEUE_DEPTH};
use pipmirror_core::controller::{StartStatus, StreamController};
use pipmirror_core::delivery::FrameQueue;
use pipmirror_core::preview::{configure_pip_window, FocusTracker, FrameSink};
use pipmirror_core::types::CapturableTarget;
use pipmirror_core::XcapProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{debug, info, warn};

use crate::headless::{HeadlessWindow, TerminalChrome, TerminalSurface};

/// Arguments for the mirror command
#[derive(Args)]
pub struct MirrorArgs {
    /// Index of the entry shown by `pipmirror list`
    index: Option<usize>,

    /// Display ID to mirror
    #[arg(short, long, conflicts_with_all = ["index", "window"])]
    display: Option<u32>,

    /// Window ID to mirror
    #[arg(short, long, conflicts_with = "index")]
    window: Option<u32>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(short, long)]
    seconds: Option<u64>,
}

/// Resolve the requested entry against a fresh list
fn pick<'a>(list: &'a TargetList, args: &MirrorArgs) -> Result<&'a TargetEntry> {
    if let Some(index) = args.index {
        return Ok(list.selectable(index)?);
    }

    let wanted = |target: &CapturableTarget| match target {
        CapturableTarget::Display(d) => args.display == Some(d.id),
        CapturableTarget::Window(w) => args.window == Some(w.id),
    };

    match list
        .entries()
        .iter()
        .find(|e| e.target().is_some_and(wanted))
    {
        Some(entry) => Ok(entry),
        None if args.display.is_some() || args.window.is_some() => {
            bail!("No capturable source with that id; run 'pipmirror list'")
        }
        None => bail!("Specify an index, --display or --window"),
    }
}

/// Mirror a source until interrupted
pub async fn mirror(args: MirrorArgs) -> Result<()> {
    let config = ConfigFile::load_or_default().resolve();
    let provider = Arc::new(XcapProvider::new(&config));

    let mut catalog =
        SourceCatalog::new(provider.clone()).with_min_window_height(config.min_window_height);
    let list = catalog
        .refresh()
        .await
        .context("Failed to enumerate capture sources")?;
    let entry = pick(list, &args)?.clone();

    let mut window = HeadlessWindow::default();
    configure_pip_window(&mut window);
    let mut focus = FocusTracker::new(TerminalChrome::default());

    let sink = Arc::new(FrameSink::with_window(TerminalSurface::default(), window));
    let queue = FrameQueue::spawn(sink.clone(), QUEUE_DEPTH);
    let mut controller = StreamController::new(provider, sink.clone(), queue.sender())
        .with_start_timeout(config.start_timeout);

    let handle = match controller.select_target(&entry) {
        Ok(Some(handle)) => handle,
        Ok(None) => bail!("Selected entry is not capturable"),
        Err(e) if e.is_fatal() => {
            // The fixed stream configuration is unusable on this platform
            return Err(e).context("Capture backend is incompatible with this build");
        }
        Err(e) => return Err(e).context("Failed to start capture"),
    };

    println!("Mirroring: {}", entry.label());
    println!("  Session:  {}", handle);
    println!("  Frames:   BGRA, queue depth {}", QUEUE_DEPTH);
    println!();
    println!("Press Ctrl+C to stop...\n");

    // The shell keeps focus while the capture runs in the background
    focus.window_did_resign_main();

    let deadline = async {
        match args.seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut report = tokio::time::interval(Duration::from_secs(1));
    let mut warned = false;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nReceived interrupt signal...");
                break;
            }
            _ = &mut deadline => {
                info!("Mirror duration elapsed");
                break;
            }
            _ = report.tick() => {
                if controller.start_status() == StartStatus::TimedOut && !warned {
                    if let Some(e) = controller.start_error() {
                        warn!("{}", e);
                        eprintln!("Warning: {}", e);
                        if let Some(hint) = e.user_hint() {
                            eprintln!("Hint: {}", hint);
                        }
                    }
                    warned = true;
                }
            }
        }
    }

    controller.stop();
    focus.window_did_become_main();
    let stats = sink.stats();
    let (frames, size) = sink.with_surface(|s| (s.frames(), s.last_size()));
    let layouts = sink.with_window_mut(|w| w.layouts()).unwrap_or(0);
    let dropped = queue.dropped();
    queue.close();

    println!("Mirror stopped.");
    debug!("Preview chrome restored: {}", focus.chrome().visible());
    println!("  Presented: {} frames", frames);
    println!("  Dropped:   {} frames", dropped);
    println!("  Stale:     {} frames", stats.stale);
    println!("  Layouts:   {}", layouts);
    if let Some((w, h)) = size {
        println!("  Last size: {}x{}", w, h);
    }

    Ok(())
}
