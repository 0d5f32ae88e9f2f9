//! Bulk copy between a mapped view and a stream
//!
//! 映射视图与数据流之间的批量复制

use std::io::{self, Read, Write};

use super::direction::TransferDirection;
use super::error::{Error, Result};

/// Outcome of a bulk copy
///
/// 批量复制的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    direction: TransferDirection,
    transferred: u64,
    capacity: u64,
}

impl Transfer {
    #[inline]
    pub fn direction(&self) -> TransferDirection {
        self.direction
    }

    /// Bytes actually moved
    ///
    /// 实际移动的字节数
    #[inline]
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Size of the mapped view
    ///
    /// 映射视图的大小
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Input ended before the view was full
    ///
    /// 输入在视图写满之前结束
    #[inline]
    pub fn is_short(&self) -> bool {
        self.transferred < self.capacity
    }
}

/// Move bytes between `view` and one of the streams
///
/// 在 `view` 与其中一个数据流之间移动字节
///
/// - [`TransferDirection::ReadFromMapping`]: all of `view` is written to `output`, looping
///   over partial writes, then `output` is flushed.
/// - [`TransferDirection::WriteToMapping`]: `input` is read into `view` until end of input
///   or until `view` is full. Input beyond `view.len()` is left unread. Stopping early on
///   end of input is not an error; see [`Transfer::is_short`].
///
/// - [`TransferDirection::ReadFromMapping`]：将整个 `view` 写入 `output`，循环处理部分写入，
///   然后刷新 `output`。
/// - [`TransferDirection::WriteToMapping`]：从 `input` 读入 `view`，直到输入结束或 `view` 写满。
///   超出 `view.len()` 的输入不会被读取。因输入结束而提前停止不是错误；见 [`Transfer::is_short`]。
///
/// # Errors
/// [`Error::Transfer`] carrying the byte count reached before the failure. A write that
/// accepts zero bytes fails with [`io::ErrorKind::WriteZero`].
///
/// # Examples
///
/// ```
/// # use fmap::{copy, TransferDirection};
/// let mut view = *b"hello";
/// let mut out = Vec::new();
/// let transfer = copy(TransferDirection::ReadFromMapping, &mut view, &mut std::io::empty(), &mut out).unwrap();
/// assert_eq!(out, b"hello");
/// assert_eq!(transfer.transferred(), 5);
/// ```
pub fn copy<R, W>(
    direction: TransferDirection,
    view: &mut [u8],
    input: &mut R,
    output: &mut W,
) -> Result<Transfer>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let (transferred, outcome) = match direction {
        TransferDirection::ReadFromMapping => {
            let (written, outcome) = write_out(view, output);
            (written, outcome.and_then(|()| output.flush()))
        }
        TransferDirection::WriteToMapping => read_into(view, input),
    };
    let transferred = transferred as u64;

    outcome.map_err(|source| Error::Transfer {
        direction,
        transferred,
        source,
    })?;

    Ok(Transfer {
        direction,
        transferred,
        capacity: view.len() as u64,
    })
}

fn write_out<W: Write + ?Sized>(buf: &[u8], output: &mut W) -> (usize, io::Result<()>) {
    let mut written = 0;
    while written < buf.len() {
        match output.write(&buf[written..]) {
            Ok(0) => {
                return (
                    written,
                    Err(io::Error::new(io::ErrorKind::WriteZero, "output accepted no bytes")),
                );
            }
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return (written, Err(err)),
        }
    }
    (written, Ok(()))
}

fn read_into<R: Read + ?Sized>(buf: &mut [u8], input: &mut R) -> (usize, io::Result<()>) {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return (filled, Err(err)),
        }
    }
    (filled, Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Accepts at most `chunk` bytes per call, after one EINTR
    struct Trickle {
        inner: Vec<u8>,
        chunk: usize,
        interrupted: bool,
    }

    impl Trickle {
        fn new(chunk: usize) -> Self {
            Self {
                inner: Vec::new(),
                chunk,
                interrupted: false,
            }
        }
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.chunk);
            self.inner.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.inner.len());
            buf[..n].copy_from_slice(&self.inner[..n]);
            self.inner = self.inner.split_off(n);
            Ok(n)
        }
    }

    /// Fails after accepting `limit` bytes
    struct Broken {
        limit: usize,
        seen: usize,
    }

    impl Write for Broken {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.seen >= self.limit {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            let n = buf.len().min(self.limit - self.seen);
            self.seen += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Full;

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_from_mapping_loops_on_partial_writes() {
        let mut view: Vec<u8> = (0..=255).collect();
        let mut out = Trickle::new(7);

        let transfer = copy(
            TransferDirection::ReadFromMapping,
            &mut view,
            &mut io::empty(),
            &mut out,
        )
        .unwrap();

        assert_eq!(out.inner, view);
        assert_eq!(transfer.transferred(), 256);
        assert!(!transfer.is_short());
    }

    #[test]
    fn test_write_to_mapping_loops_on_partial_reads() {
        let mut input = Trickle::new(3);
        input.inner = b"abcdefghij".to_vec();
        let mut view = [0u8; 10];

        let transfer = copy(
            TransferDirection::WriteToMapping,
            &mut view,
            &mut input,
            &mut io::sink(),
        )
        .unwrap();

        assert_eq!(&view, b"abcdefghij");
        assert_eq!(transfer.transferred(), 10);
        assert_eq!(transfer.capacity(), 10);
    }

    #[test]
    fn test_short_input_is_not_an_error() {
        let mut view = [0xffu8; 8];
        let transfer = copy(
            TransferDirection::WriteToMapping,
            &mut view,
            &mut Cursor::new(b"abc".to_vec()),
            &mut io::sink(),
        )
        .unwrap();

        assert!(transfer.is_short());
        assert_eq!(transfer.transferred(), 3);
        assert_eq!(&view, b"abc\xff\xff\xff\xff\xff");
    }

    #[test]
    fn test_excess_input_is_not_consumed() {
        let mut view = [0u8; 4];
        let mut input = Cursor::new(b"0123456789".to_vec());

        let transfer = copy(
            TransferDirection::WriteToMapping,
            &mut view,
            &mut input,
            &mut io::sink(),
        )
        .unwrap();

        assert_eq!(transfer.transferred(), 4);
        assert_eq!(&view, b"0123");
        assert_eq!(input.position(), 4);
    }

    #[test]
    fn test_write_error_reports_progress() {
        let mut view = [1u8; 100];
        let err = copy(
            TransferDirection::ReadFromMapping,
            &mut view,
            &mut io::empty(),
            &mut Broken { limit: 40, seen: 0 },
        )
        .unwrap_err();

        match err {
            Error::Transfer {
                direction,
                transferred,
                source,
            } => {
                assert_eq!(direction, TransferDirection::ReadFromMapping);
                assert_eq!(transferred, 40);
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_write_is_an_error() {
        let mut view = [1u8; 3];
        let err = copy(
            TransferDirection::ReadFromMapping,
            &mut view,
            &mut io::empty(),
            &mut Full,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Transfer { ref source, transferred: 0, .. } if source.kind() == io::ErrorKind::WriteZero
        ));
    }

    #[test]
    fn test_empty_view() {
        let mut view = [0u8; 0];
        let transfer = copy(
            TransferDirection::ReadFromMapping,
            &mut view,
            &mut io::empty(),
            &mut Full,
        )
        .unwrap();
        assert_eq!(transfer.transferred(), 0);
        assert!(!transfer.is_short());
    }
}
