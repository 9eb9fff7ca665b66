use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use crossbeam::channel::{bounded, Receiver, Sender};
use walkdir::WalkDir;
use crate::core::config::IngestConfig;
use crate::core::engine::Engine;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Fields;
use crate::parallel::id::IdStrategy;
use crate::parser::{CsvDecoder, JsonLinesDecoder, RecordDecoder};

/// Aggregate outcome of an ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub documents_indexed: usize,
    pub rows_failed: usize,
    pub elapsed: Duration,
}

impl IngestReport {
    pub fn merge(&mut self, other: IngestReport) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.documents_indexed += other.documents_indexed;
        self.rows_failed += other.rows_failed;
        self.elapsed += other.elapsed;
    }
}

/// Shared by all workers of one run; only successes bump the success counters.
#[derive(Default)]
struct Counters {
    files_processed: AtomicUsize,
    files_failed: AtomicUsize,
    documents_indexed: AtomicUsize,
    rows_failed: AtomicUsize,
}

impl Counters {
    fn report(&self, elapsed: Duration) -> IngestReport {
        IngestReport {
            files_processed: self.files_processed.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            documents_indexed: self.documents_indexed.load(Ordering::Relaxed),
            rows_failed: self.rows_failed.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Bulk ingestion into an `Engine`.
///
/// A walker thread feeds file paths into a bounded channel; a fixed pool of
/// workers drains it, decodes each file with the decoder registered for its
/// extension and indexes every row. A full channel blocks the walker, so
/// slow indexing throttles the directory traversal. Failures of a single
/// file or row are logged and skipped.
pub struct Ingestor {
    engine: Arc<Engine>,
    config: IngestConfig,
    decoders: Vec<Arc<dyn RecordDecoder>>,
    ids: IdStrategy,
}

impl Ingestor {
    /// Ingestor with the CSV and JSON-lines decoders registered.
    pub fn new(engine: Arc<Engine>, config: IngestConfig) -> Self {
        let mut ingestor = Self::with_decoders(engine, config, Vec::new());
        ingestor.register(Arc::new(CsvDecoder::new()));
        ingestor.register(Arc::new(JsonLinesDecoder::new()));
        ingestor
    }

    pub fn with_decoders(
        engine: Arc<Engine>,
        config: IngestConfig,
        decoders: Vec<Arc<dyn RecordDecoder>>,
    ) -> Self {
        let ids = IdStrategy::from_config(&config);
        Ingestor { engine, config, decoders, ids }
    }

    /// Later registrations win for a shared extension.
    pub fn register(&mut self, decoder: Arc<dyn RecordDecoder>) {
        self.decoders.insert(0, decoder);
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    fn decoder_for_extension(&self, extension: &str) -> Option<&Arc<dyn RecordDecoder>> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.decoders.iter()
            .find(|decoder| decoder.extensions().contains(&extension.as_str()))
    }

    fn decoder_for(&self, path: &Path) -> Option<&Arc<dyn RecordDecoder>> {
        let extension = path.extension()?.to_str()?;
        self.decoder_for_extension(extension)
    }

    /// Ingests every directory listed in the configuration, one after another.
    pub fn ingest_configured_dirs(&self) -> Result<IngestReport> {
        let mut total = IngestReport::default();
        for dir in &self.config.dirs {
            total.merge(self.ingest_dir(dir)?);
        }
        Ok(total)
    }

    /// Walks `root` and ingests every file with a registered extension.
    pub fn ingest_dir(&self, root: impl AsRef<Path>) -> Result<IngestReport> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::new(
                ErrorKind::Io,
                format!("Ingest root {} is not a directory", root.display()),
            ));
        }

        let start = Instant::now();
        let counters = Counters::default();
        let workers = self.config.effective_workers();
        let (path_tx, path_rx) = bounded::<PathBuf>(self.config.queue_capacity.max(1));

        thread::scope(|s| {
            s.spawn(|| self.walk(root, path_tx));

            for _ in 0..workers {
                let path_rx = path_rx.clone();
                let counters = &counters;
                s.spawn(move || self.drain(path_rx, counters));
            }
        });

        // Every worker has been joined by the scope above
        let report = counters.report(start.elapsed());
        tracing::info!(
            target: "sage::ingest",
            root = %root.display(),
            files = report.files_processed,
            failed_files = report.files_failed,
            documents = report.documents_indexed,
            elapsed = ?report.elapsed,
            "ingestion finished"
        );
        Ok(report)
    }

    /// Decodes and indexes a single in-memory stream, e.g. an uploaded file.
    pub fn ingest_reader(&self, mut reader: impl Read, extension: &str) -> Result<IngestReport> {
        let decoder = self.decoder_for_extension(extension).ok_or_else(|| {
            Error::new(ErrorKind::InvalidArgument, format!("No decoder registered for '{}'", extension))
        })?;

        let start = Instant::now();
        let counters = Counters::default();
        self.run_decoder(decoder.as_ref(), &mut reader, &counters)?;
        counters.files_processed.fetch_add(1, Ordering::Relaxed);
        Ok(counters.report(start.elapsed()))
    }

    /// Producer: dropping `path_tx` on return closes the channel.
    fn walk(&self, root: &Path, path_tx: Sender<PathBuf>) {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(target: "sage::ingest", error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || self.decoder_for(entry.path()).is_none() {
                continue;
            }

            if path_tx.send(entry.into_path()).is_err() {
                break;
            }
        }
    }

    fn drain(&self, path_rx: Receiver<PathBuf>, counters: &Counters) {
        for path in path_rx {
            self.process_file(&path, counters);
        }
    }

    fn process_file(&self, path: &Path, counters: &Counters) {
        let Some(decoder) = self.decoder_for(path) else {
            return;
        };

        let start = Instant::now();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(target: "sage::ingest", file = %path.display(), error = %err, "failed to open file");
                counters.files_failed.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let mut reader = BufReader::new(file);
        match self.run_decoder(decoder.as_ref(), &mut reader, counters) {
            Ok(indexed) => {
                counters.files_processed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    target: "sage::ingest",
                    file = %path.display(),
                    docs = indexed,
                    elapsed = ?start.elapsed(),
                    "parsed file"
                );
            }
            Err(err) => {
                tracing::warn!(target: "sage::ingest", file = %path.display(), error = %err, "failed to parse file");
                counters.files_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Returns the number of rows indexed from this stream.
    fn run_decoder(
        &self,
        decoder: &dyn RecordDecoder,
        reader: &mut dyn Read,
        counters: &Counters,
    ) -> Result<usize> {
        if self.config.row_buffer == 0 {
            let mut indexed = 0;
            let summary = decoder.decode(reader, &mut |row| {
                if self.index_row(row, counters) {
                    indexed += 1;
                }
            })?;
            counters.rows_failed.fetch_add(summary.failed_rows, Ordering::Relaxed);
            return Ok(indexed);
        }

        // Decode stage on this thread, index stage on its own, joined through
        // a bounded row buffer
        let (row_tx, row_rx) = bounded::<Fields>(self.config.row_buffer);
        let (summary, indexed) = thread::scope(|s| {
            let index_stage = s.spawn(move || {
                row_rx.into_iter()
                    .map(|row| self.index_row(row, counters))
                    .filter(|ok| *ok)
                    .count()
            });

            let summary = decoder.decode(reader, &mut |row| {
                // Only fails if the index stage is gone, which the join reports
                let _ = row_tx.send(row);
            });
            drop(row_tx);

            (summary, index_stage.join())
        });

        let indexed = indexed.map_err(|_| {
            Error::new(ErrorKind::Internal, "Index stage panicked".to_string())
        })?;
        let summary = summary?;
        counters.rows_failed.fetch_add(summary.failed_rows, Ordering::Relaxed);
        Ok(indexed)
    }

    fn index_row(&self, row: Fields, counters: &Counters) -> bool {
        let doc_id = self.ids.derive(&row);
        match self.engine.index(row, doc_id.clone()) {
            Ok(_) => {
                counters.documents_indexed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(err) => {
                tracing::warn!(target: "sage::ingest", doc_id = %doc_id, error = %err, "failed to index row");
                counters.rows_failed.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}
