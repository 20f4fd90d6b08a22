//! The frame acquisition loop.
//!
//! Reading is blocking, so it runs on the blocking thread pool and hands
//! completed frames over a bounded channel. The async side decodes each
//! frame into the metrics sink. A `watch` flag asks the reader to stop; it
//! is observed between reads, i.e. at least once per serial read timeout.

use crate::error::{Result, SensorError};
use crate::sensor::{ByteSource, Frame, FrameDecoder, FrameSynchronizer};
use futures_util::stream::BoxStream;
use std::io::ErrorKind;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

/// Frames buffered between the reader thread and the decoder.
pub const FRAME_CHANNEL_CAPACITY: usize = 16;

/// Blocking frame reader over a byte source.
pub struct FrameReader<S> {
    source: S,
    synchronizer: FrameSynchronizer,
}

impl<S: ByteSource> FrameReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            synchronizer: FrameSynchronizer::new(),
        }
    }

    /// Read until a frame completes.
    ///
    /// Returns `Ok(None)` when the source timed out with nothing to read,
    /// and `Err(SensorError::StreamClosed)` on a zero-length read. Bytes of
    /// a partially assembled frame are dropped when the stream ends.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read_bytes(&mut byte) {
                Ok(0) => {
                    if self.synchronizer.position() > 0 {
                        debug!(
                            "Discarding partial frame ({} bytes)",
                            self.synchronizer.position()
                        );
                    }
                    self.synchronizer.reset();
                    return Err(SensorError::StreamClosed);
                }
                Ok(_) => {
                    if let Some(frame) = self.synchronizer.push(byte[0]) {
                        return Ok(Some(frame));
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(None);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn synchronizer(&self) -> &FrameSynchronizer {
        &self.synchronizer
    }
}

/// Start the blocking reader and return its frame stream.
///
/// The join handle yields `Ok(())` when the reader stopped because of the
/// shutdown flag or because the stream was dropped, and the fatal error
/// otherwise.
pub fn spawn_reader<S>(
    source: S,
    shutdown: watch::Receiver<bool>,
) -> (BoxStream<'static, Frame>, JoinHandle<Result<()>>)
where
    S: ByteSource + 'static,
{
    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

    let handle = tokio::task::spawn_blocking(move || {
        let mut reader = FrameReader::new(source);
        loop {
            if *shutdown.borrow() {
                info!("Frame reader stopping on shutdown");
                return Ok(());
            }
            if let Some(frame) = reader.next_frame()? {
                if tx.blocking_send(frame).is_err() {
                    debug!("Frame consumer gone, stopping reader");
                    return Ok(());
                }
            }
        }
    });

    (Box::pin(ReceiverStream::new(rx)), handle)
}

/// Read, decode and publish frames until shutdown or a fatal stream error.
pub async fn run_acquisition<S>(
    source: S,
    decoder: FrameDecoder,
    shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    S: ByteSource + 'static,
{
    let (mut frames, reader) = spawn_reader(source, shutdown);

    let mut count: u64 = 0;
    while let Some(frame) = frames.next().await {
        decoder.process(&frame);
        count += 1;
    }
    debug!("Frame stream ended after {} frames", count);

    match reader.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("Sensor stream failed: {}", e);
            Err(e)
        }
        Err(e) => Err(SensorError::task_error(format!("Frame reader task failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AtomicGauges, Dimension};
    use crate::sensor::DecoderConfig;
    use std::io::{self, Cursor, Read};
    use std::sync::Arc;

    fn sample() -> Vec<u8> {
        vec![
            0x16, 0x11, 0x0B, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00,
            0x32, 0x00, 0x00, 0x00, 0x00, 0x0B,
        ]
    }

    /// Source that replays scripted reads, then reports end of stream.
    struct ScriptedSource {
        script: Vec<io::Result<Vec<u8>>>,
        pending: Cursor<Vec<u8>>,
    }

    impl ScriptedSource {
        fn new(mut script: Vec<io::Result<Vec<u8>>>) -> Self {
            script.reverse();
            Self {
                script,
                pending: Cursor::new(Vec::new()),
            }
        }
    }

    impl Read for ScriptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            loop {
                let n = self.pending.read(buf)?;
                if n > 0 {
                    return Ok(n);
                }
                match self.script.pop() {
                    Some(Ok(bytes)) => self.pending = Cursor::new(bytes),
                    Some(Err(e)) => return Err(e),
                    None => return Ok(0),
                }
            }
        }
    }

    #[test]
    fn test_reader_returns_frame_then_stream_closed() {
        let mut reader = FrameReader::new(Cursor::new(sample()));
        let frame = reader.next_frame().unwrap().expect("frame");
        assert!(frame.is_valid());
        assert!(matches!(reader.next_frame(), Err(SensorError::StreamClosed)));
    }

    #[test]
    fn test_partial_frame_discarded_at_eof() {
        let mut reader = FrameReader::new(Cursor::new(sample()[..12].to_vec()));
        assert!(matches!(reader.next_frame(), Err(SensorError::StreamClosed)));
        assert_eq!(reader.synchronizer().position(), 0);
    }

    #[test]
    fn test_timeout_is_an_idle_tick() {
        let mut script = vec![Ok(sample()[..5].to_vec())];
        script.push(Err(io::Error::new(ErrorKind::TimedOut, "idle")));
        script.push(Ok(sample()[5..].to_vec()));
        let mut reader = FrameReader::new(ScriptedSource::new(script));

        assert!(reader.next_frame().unwrap().is_none());
        let frame = reader.next_frame().unwrap().expect("frame resumes after timeout");
        assert_eq!(frame.decode().pm2_5, 300);
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let script = vec![Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged"))];
        let mut reader = FrameReader::new(ScriptedSource::new(script));
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, SensorError::Io(_)));
        assert!(err.is_fatal_stream_error());
    }

    #[tokio::test]
    async fn test_run_acquisition_publishes_then_reports_eof() {
        let gauges = Arc::new(AtomicGauges::new());
        let decoder = FrameDecoder::new(gauges.clone(), DecoderConfig::default());
        let (_tx, rx) = watch::channel(false);

        let mut stream = vec![0x11, 0x0B];
        stream.extend(sample());
        stream.extend(&sample()[..7]);

        let result = run_acquisition(Cursor::new(stream), decoder, rx).await;
        assert!(matches!(result, Err(SensorError::StreamClosed)));
        assert_eq!(gauges.get(Dimension::Pm2_5), Some(300));
        assert_eq!(gauges.get(Dimension::Pm1_0), Some(100));
        assert_eq!(gauges.get(Dimension::Pm10), Some(50));
    }

    #[tokio::test]
    async fn test_shutdown_stops_reader() {
        let gauges = Arc::new(AtomicGauges::new());
        let decoder = FrameDecoder::new(gauges.clone(), DecoderConfig::default());
        let (_tx, rx) = watch::channel(true);

        let result = run_acquisition(Cursor::new(sample()), decoder, rx).await;
        assert!(result.is_ok());
        assert!(gauges.reading().is_none());
    }

    #[tokio::test]
    async fn test_spawn_reader_streams_frames() {
        let (_tx, rx) = watch::channel(false);
        let mut bytes = sample();
        bytes.extend(sample());

        let (frames, handle) = spawn_reader(Cursor::new(bytes), rx);
        let frames: Vec<Frame> = frames.collect().await;
        assert_eq!(frames.len(), 2);
        assert!(matches!(handle.await.unwrap(), Err(SensorError::StreamClosed)));
    }
}
