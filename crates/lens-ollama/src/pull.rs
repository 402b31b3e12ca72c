use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use lens_types::{PullEvent, PullProgress};
use tokio_util::sync::CancellationToken;

use crate::error::OllamaError;

/// Progress of one model download.
///
/// Events come out in arrival order. The stream ends when the server closes
/// the connection, on the first error, or once after cancellation.
pub struct PullStream {
    chunks: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    lines: LineBuffer,
    cancel: CancellationToken,
    finished: bool,
}

impl PullStream {
    pub(crate) fn new(
        chunks: BoxStream<'static, reqwest::Result<Vec<u8>>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            chunks,
            lines: LineBuffer::default(),
            cancel,
            finished: false,
        }
    }

    pub async fn next(&mut self) -> Option<Result<PullProgress, OllamaError>> {
        loop {
            if self.finished {
                return None;
            }

            if self.cancel.is_cancelled() {
                self.finished = true;
                return Some(Err(OllamaError::Cancelled));
            }

            if let Some(line) = self.lines.next_line() {
                return Some(self.decode(&line));
            }

            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.finished = true;
                    return Some(Err(OllamaError::Cancelled));
                }
                chunk = self.chunks.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => self.lines.push(&bytes),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    return self.lines.take_remainder().map(|line| self.decode(&line));
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Invalid UTF-8 fails here the same way malformed JSON does
    fn decode(&mut self, line: &[u8]) -> Result<PullProgress, OllamaError> {
        let event: PullEvent = match serde_json::from_slice(line) {
            Ok(event) => event,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };

        if let Some(error) = event.error {
            self.finished = true;
            return Err(OllamaError::Server(error));
        }

        tracing::trace!(status = %event.status, completed = ?event.completed, total = ?event.total);
        Ok(PullProgress::from_event(&event))
    }
}

/// Splits a byte stream into newline-terminated lines
#[derive(Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete non-blank line, without its line ending
    fn next_line(&mut self) -> Option<Vec<u8>> {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = raw.trim_ascii();
            if !line.is_empty() {
                return Some(line.to_vec());
            }
        }
        None
    }

    /// Whatever is left once the stream closes without a final newline
    fn take_remainder(&mut self) -> Option<Vec<u8>> {
        if let Some(line) = self.next_line() {
            return Some(line);
        }
        let rest = std::mem::take(&mut self.buf);
        let line = rest.trim_ascii();
        (!line.is_empty()).then(|| line.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::stream;

    use super::*;

    fn stream_of(chunks: &[&str]) -> PullStream {
        let owned: Vec<reqwest::Result<Vec<u8>>> = chunks
            .iter()
            .map(|c| Ok(c.as_bytes().to_vec()))
            .collect();
        PullStream::new(stream::iter(owned).boxed(), CancellationToken::new())
    }

    async fn collect(mut stream: PullStream) -> Vec<Result<PullProgress, OllamaError>> {
        let mut out = vec![];
        while let Some(item) = stream.next().await {
            out.push(item);
        }
        out
    }

    #[test]
    fn line_buffer_joins_split_chunks() {
        let mut lines = LineBuffer::default();
        lines.push(b"{\"status\":\"pul");
        assert_eq!(lines.next_line(), None);
        lines.push(b"ling\"}\n\n{\"status\":\"ok\"}");
        assert_eq!(lines.next_line().as_deref(), Some(&b"{\"status\":\"pulling\"}"[..]));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.take_remainder().as_deref(), Some(&b"{\"status\":\"ok\"}"[..]));
        assert_eq!(lines.take_remainder(), None);
    }

    #[tokio::test]
    async fn digest_events_report_percent_in_order() {
        let stream = stream_of(&[
            "{\"status\":\"pulling x\",\"digest\":\"x\",\"completed\":50,\"total\":100}\n",
            "{\"status\":\"pulling x\",\"digest\":\"x\",\"completed\":100,\"total\":100}\n",
        ]);

        let percents: Vec<u8> = collect(stream)
            .await
            .into_iter()
            .map(|p| p.unwrap().percent)
            .collect();
        assert_eq!(percents, vec![50, 100]);
    }

    #[tokio::test]
    async fn non_digest_event_resets_progress() {
        let stream = stream_of(&[
            "{\"status\":\"pulling x\",\"digest\":\"x\",\"completed\":60,\"total\":100}\n",
            "{\"status\":\"verifying sha256 digest\"}\n",
        ]);

        let events = collect(stream).await;
        let last = events.last().unwrap().as_ref().unwrap();
        assert_eq!(last.percent, 0);
        assert_eq!(last.status, "verifying sha256 digest");
    }

    #[tokio::test]
    async fn unterminated_last_line_is_parsed() {
        let stream = stream_of(&["{\"status\":\"pulling manifest\"}\n{\"status\":\"success\"}"]);
        let statuses: Vec<String> = collect(stream)
            .await
            .into_iter()
            .map(|p| p.unwrap().status)
            .collect();
        assert_eq!(statuses, vec!["pulling manifest", "success"]);
    }

    #[tokio::test]
    async fn streamed_error_ends_the_sequence() {
        let stream = stream_of(&[
            "{\"status\":\"pulling manifest\"}\n",
            "{\"error\":\"pull model manifest: file does not exist\"}\n",
            "{\"status\":\"never seen\"}\n",
        ]);

        let events = collect(stream).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], Err(OllamaError::Server(msg)) if msg.contains("does not exist")));
    }

    #[tokio::test]
    async fn malformed_line_is_a_decode_error() {
        let events = collect(stream_of(&["not json\n"])).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(OllamaError::Decode(_))));
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_decode_error() {
        let items: Vec<reqwest::Result<Vec<u8>>> = vec![
            Ok(b"{\"status\":\"pulling \xff\xfe\"}\n".to_vec()),
            Ok(b"{\"status\":\"never seen\"}\n".to_vec()),
        ];
        let events = collect(PullStream::new(
            stream::iter(items).boxed(),
            CancellationToken::new(),
        ))
        .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(OllamaError::Decode(_))));
    }

    #[tokio::test]
    async fn cancellation_ends_stream_once() {
        let cancel = CancellationToken::new();
        let items: Vec<reqwest::Result<Vec<u8>>> = vec![
            Ok(b"{\"status\":\"a\"}\n".to_vec()),
            Ok(b"{\"status\":\"b\"}\n".to_vec()),
        ];
        let chunks = stream::iter(items).boxed();
        let mut stream = PullStream::new(chunks, cancel.clone());

        assert_eq!(stream.next().await.unwrap().unwrap().status, "a");
        cancel.cancel();
        assert!(matches!(stream.next().await, Some(Err(OllamaError::Cancelled))));
        assert!(stream.next().await.is_none());
        assert!(stream.is_finished());
    }

    #[tokio::test]
    async fn pending_stream_wakes_on_cancel() {
        let cancel = CancellationToken::new();
        let mut stream = PullStream::new(
            stream::pending::<reqwest::Result<Vec<u8>>>().boxed(),
            cancel.clone(),
        );

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let result = tokio::time::timeout(std::time::Duration::from_secs(2), stream.next())
            .await
            .expect("cancel should wake the stream");
        assert!(matches!(result, Some(Err(OllamaError::Cancelled))));
        canceller.await.unwrap();
    }
}
