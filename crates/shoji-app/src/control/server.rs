//! Line-oriented control server on stdin/stdout.
//!
//! Requests are read one line at a time and handled strictly in order:
//! the next line is not read until the previous request has answered, so
//! the control process observes its calls in the order it issued them.
//! Notifications are interleaved with responses by a single writer task.

use std::io;
use std::thread;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};

use crate::shell::Shell;

use super::methods;
use super::protocol::{Notification, Request, Response};

/// Serve the control protocol on a dedicated thread with its own runtime.
pub fn spawn(
    shell: Shell,
    notifications: UnboundedReceiver<Notification>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("shoji-control".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!(error = %e, "control runtime could not start");
                    return;
                }
            };
            let stdin = BufReader::new(tokio::io::stdin());
            match rt.block_on(serve(shell, stdin, tokio::io::stdout(), notifications)) {
                Ok(_) => info!("control stream closed"),
                Err(e) => error!(error = %e, "control stream failed"),
            }
        })
}

/// Answer requests from `reader` until it ends, then quit the shell.
/// Returns the writer once everything queued has been flushed.
pub async fn serve<R, W>(
    shell: Shell,
    reader: R,
    writer: W,
    notifications: UnboundedReceiver<Notification>,
) -> io::Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (responses, response_rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_lines(writer, response_rx, notifications));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = answer(&shell, line).await;
        if responses.send(response).is_err() {
            warn!("control writer stopped; ending session");
            break;
        }
    }

    info!("control input ended; quitting");
    let quitter = shell.clone();
    match tokio::task::spawn_blocking(move || quitter.quit()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(error = %e, "quit after end of input"),
        Err(e) => warn!(error = %e, "quit task failed"),
    }

    drop(responses);
    writer_task.await.map_err(io::Error::other)?
}

async fn answer(shell: &Shell, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "malformed control request");
            return Response::err(0, format!("malformed request: {e}"));
        }
    };

    let Request { id, method, params } = request;
    let shell = shell.clone();
    let task = tokio::task::spawn_blocking(move || methods::handle(&shell, &method, params));
    match task.await {
        Ok(Ok(result)) => Response::ok(id, result),
        Ok(Err(e)) => {
            debug!(id, error = %e, "control request failed");
            Response::err(id, e.to_string())
        }
        Err(e) => {
            error!(id, error = %e, "control request panicked");
            Response::err(id, "internal error")
        }
    }
}

async fn write_lines<W>(
    mut writer: W,
    mut responses: UnboundedReceiver<Response>,
    mut notifications: UnboundedReceiver<Notification>,
) -> io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    let mut notifications_open = true;
    loop {
        tokio::select! {
            response = responses.recv() => match response {
                Some(response) => write_line(&mut writer, &response).await?,
                None => break,
            },
            notification = notifications.recv(), if notifications_open => match notification {
                Some(notification) => write_line(&mut writer, &notification).await?,
                None => notifications_open = false,
            },
        }
    }

    while let Ok(notification) = notifications.try_recv() {
        write_line(&mut writer, &notification).await?;
    }
    writer.flush().await?;
    Ok(writer)
}

async fn write_line<W, T>(writer: &mut W, message: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}

// =============================================================================
// TESTS
// =============================================================================
