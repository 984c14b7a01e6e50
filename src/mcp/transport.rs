//! Newline-delimited stdio transport
//!
//! Each inbound line is handled on its own task so slow upstream calls do not
//! block the session; responses are written back in completion order.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::server::McpServer;

/// Serve the MCP session on the process's stdin/stdout
pub async fn serve_stdio(server: Arc<McpServer>) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(server, stdin, stdout).await
}

/// Serve the MCP session until the reader reaches EOF
pub async fn serve<R, W>(server: Arc<McpServer>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_message(&line, Some(&tx)).await {
                // Receiver only goes away if the writer failed
                let _ = tx.send(response);
            }
        });
    }

    log::info!("Input closed, waiting for in-flight requests");
    drop(tx);
    writer_task.await??;
    Ok(())
}
