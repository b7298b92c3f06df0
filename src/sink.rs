use {
    crate::errors::ConfigError,
    std::{io, path::Path},
    tokio::{
        fs::{File, OpenOptions},
        io::{AsyncWrite, AsyncWriteExt},
        sync::mpsc,
        task::JoinHandle,
    },
    tracing::error,
};

/// Capacity of the queue between resolution workers and the writer.
pub const RESULTS_BUFFER: usize = 100;

/// Single writer draining formatted result lines from any number of
/// producers. Lines are written in the order they are received.
pub struct ResultSink<W> {
    primary: W,
    output_file: Option<File>,
}

impl<W> ResultSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(primary: W, output_file: Option<File>) -> Self {
        Self {
            primary,
            output_file,
        }
    }

    /// Starts the writer task. It runs until every sender is dropped and
    /// hands the primary writer back when done.
    pub fn spawn(self) -> (mpsc::Sender<String>, JoinHandle<io::Result<W>>) {
        let (tx, rx) = mpsc::channel(RESULTS_BUFFER);
        (tx, tokio::spawn(self.run(rx)))
    }

    async fn run(mut self, mut results: mpsc::Receiver<String>) -> io::Result<W> {
        while let Some(result) = results.recv().await {
            self.write_line(&result).await?;
        }

        if let Some(file) = self.output_file.as_mut() {
            file.flush().await?;
        }
        Ok(self.primary)
    }

    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let line = format!("{line}\n");

        self.primary.write_all(line.as_bytes()).await?;
        self.primary.flush().await?;

        if let Some(file) = self.output_file.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()).await {
                error!(error = %e, "failed writing result to output file");
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Opens `path` for appending, creating it when missing.
pub async fn open_output_file(path: &Path) -> Result<File, ConfigError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| ConfigError::OutputFile {
            path: path.to_owned(),
            source,
        })
}
