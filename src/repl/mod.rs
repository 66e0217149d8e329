//! Interactive Shell Module
//!
//! Line-oriented read-eval-print loop over the catalog.
//!
//! # Commands
//! - `map` / `mapb` - Page forward and back through location areas
//! - `explore <area>` - List the creatures found in an area
//! - `catch <name>` / `inspect <name>` / `pokedex` - Manage the collection
//! - `fight <a> <b>` - Pit two caught creatures against each other
//! - `history`, `cache`, `help`, `exit`

pub mod catch;
pub mod commands;
pub mod fight;
mod session;

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::Result;

pub use commands::Command;
pub use session::{Flow, Session};

pub const PROMPT: &str = "Pokedex > ";

// == Line Sources ==
/// Where the shell reads its input lines from.
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LineSource for Lines<R> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

#[async_trait]
impl LineSource for mpsc::Receiver<io::Result<String>> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.recv().await.transpose()
    }
}

/// Reads `reader` line by line on a dedicated OS thread.
///
/// A blocking read there never holds up runtime shutdown: the thread is
/// detached and ends with the process.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;

    Ok(rx)
}

/// Lines from the process's standard input.
pub fn stdin_lines() -> io::Result<mpsc::Receiver<io::Result<String>>> {
    spawn_line_reader(io::BufReader::new(io::stdin()))
}

// == Loop ==
/// Runs the shell over `input` until `exit` or end of input.
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write,
{
    run_lines(session, input.lines(), out).await
}

/// Runs the shell until `exit`, end of input, or `shutdown` resolves.
pub async fn run_until<L, W, F>(
    session: &mut Session,
    lines: L,
    out: &mut W,
    shutdown: F,
) -> Result<()>
where
    L: LineSource,
    W: Write,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = run_lines(session, lines, out) => result,
        _ = shutdown => {
            info!("Shutdown requested, leaving the shell");
            Ok(())
        }
    }
}

/// Command failures are reported to `out` and the loop continues; only a
/// failure to read input or write output ends the loop with an error.
pub async fn run_lines<L, W>(session: &mut Session, mut lines: L, out: &mut W) -> Result<()>
where
    L: LineSource,
    W: Write,
{
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };

        match session.execute(&line, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) => {
                warn!(input = %line, "command failed: {}", e);
                writeln!(out, "Error: {}", e)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogClient;
    use crate::cache::SharedCache;
    use crate::collection::SqliteCollection;
    use crate::error::TransportError;
    use crate::fetch::{Fetcher, ReadThrough};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct OfflineFetcher;

    #[async_trait]
    impl Fetcher for OfflineFetcher {
        async fn fetch(&self, _key: &str) -> std::result::Result<Vec<u8>, TransportError> {
            Err(TransportError::Other("offline".to_string()))
        }
    }

    async fn offline_session() -> Session {
        let cache = SharedCache::start(Duration::from_secs(60)).await;
        let reader = ReadThrough::new(cache, Arc::new(OfflineFetcher));
        let store = SqliteCollection::in_memory().await.unwrap();
        Session::new(CatalogClient::new(reader, "http://catalog/"), Arc::new(store))
    }

    #[tokio::test]
    async fn test_run_stops_at_exit() {
        let mut session = offline_session().await;
        let mut out = Vec::new();

        run(&mut session, &b"help\nexit\npokedex\n"[..], &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Welcome to the Pokedex!"));
        assert!(out.contains("Exiting Pokedex..."));
        assert_eq!(session.history(), ["help", "exit"]);
    }

    #[tokio::test]
    async fn test_run_reports_errors_and_continues() {
        let mut session = offline_session().await;
        let mut out = Vec::new();

        run(&mut session, &b"map\npokedex"[..], &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error: failed to fetch http://catalog/location-area/"));
        assert!(out.contains("You have not caught any pokemon yet."));
    }

    #[tokio::test]
    async fn test_line_reader_yields_lines_then_ends() {
        let mut lines = spawn_line_reader(io::Cursor::new("help\nexit\n")).unwrap();

        assert_eq!(lines.next_line().await.unwrap(), Some("help".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), Some("exit".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown_while_waiting_for_input() {
        let mut session = offline_session().await;
        let mut out = Vec::new();
        let (_tx, rx) = mpsc::channel::<io::Result<String>>(1);
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        stop_tx.send(()).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_until(&mut session, rx, &mut out, async {
                let _ = stop_rx.await;
            }),
        )
        .await
        .expect("shell should stop on shutdown");

        result.unwrap();
        session.client().reader().cache().shutdown().await;
    }

    /// A reader whose first read blocks until its gate is dropped.
    struct BlockedReader(std::sync::mpsc::Receiver<()>);

    impl io::Read for BlockedReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_runtime_shuts_down_while_a_read_is_blocked() {
        let (gate, blocked) = std::sync::mpsc::channel::<()>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let worker = std::thread::spawn(move || {
            runtime.block_on(async {
                let mut session = offline_session().await;
                let lines = spawn_line_reader(io::BufReader::new(BlockedReader(blocked))).unwrap();
                let mut out = Vec::new();
                run_until(&mut session, lines, &mut out, async {}).await.unwrap();
                session.client().reader().cache().shutdown().await;
            });
            drop(runtime);
            let _ = done_tx.send(());
        });

        let finished = done_rx.recv_timeout(Duration::from_secs(5)).is_ok();
        drop(gate);
        worker.join().unwrap();
        assert!(finished, "runtime shutdown waited on a blocked read");
    }
}
