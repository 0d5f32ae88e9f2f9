//! Transfer direction selection
//!
//! 传输方向选择

use std::fmt;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Which way the bulk copy moves bytes
///
/// 批量复制的数据流向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferDirection {
    /// Mapping → output
    ///
    /// 映射 → 输出
    ReadFromMapping,

    /// Input → mapping
    ///
    /// 输入 → 映射
    WriteToMapping,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferDirection::ReadFromMapping => "Reading",
            TransferDirection::WriteToMapping => "Writing",
        })
    }
}

/// Non-blocking look at an input stream
///
/// 对输入流的非阻塞探测
pub trait InputProbe {
    /// Bytes that can be read right now without blocking; must not consume any
    ///
    /// 当前无需阻塞即可读取的字节数；不得消耗任何字节
    fn pending(&self) -> io::Result<usize>;
}

/// [`InputProbe`] over a file descriptor, using `FIONREAD`
///
/// 基于文件描述符的 [`InputProbe`]，使用 `FIONREAD`
#[derive(Debug, Clone, Copy)]
pub struct FdProbe<'fd> {
    fd: BorrowedFd<'fd>,
}

impl<'fd> FdProbe<'fd> {
    #[inline]
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        Self { fd }
    }
}

impl InputProbe for FdProbe<'_> {
    fn pending(&self) -> io::Result<usize> {
        let mut pending: libc::c_int = 0;
        // SAFETY: FIONREAD writes a single c_int through the pointer, which is valid for the call.
        let ret = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                libc::FIONREAD,
                &mut pending as *mut libc::c_int,
            )
        };
        if ret == -1 {
            return Err(io::Error::last_os_error());
        }
        usize::try_from(pending).map_err(|_| io::Error::other("negative FIONREAD count"))
    }
}

/// Pick the direction from what `probe` reports right now
///
/// 根据 `probe` 当前的报告选择方向
///
/// One or more buffered bytes select [`TransferDirection::WriteToMapping`]; zero bytes or a
/// failing probe select [`TransferDirection::ReadFromMapping`]. Input arriving after the
/// probe is not seen; waiting for it instead would hang when no input ever comes.
///
/// 有一个或多个已缓冲字节时选择 [`TransferDirection::WriteToMapping`]；
/// 零字节或探测失败时选择 [`TransferDirection::ReadFromMapping`]。
/// 探测之后才到达的输入不会被看到；若改为等待，则在永远没有输入时会挂起。
pub fn select<P: InputProbe + ?Sized>(probe: &P) -> TransferDirection {
    match probe.pending() {
        Ok(0) => TransferDirection::ReadFromMapping,
        Ok(_) => TransferDirection::WriteToMapping,
        Err(err) => {
            log::debug!("Input probe failed ({err}): nothing to write");
            TransferDirection::ReadFromMapping
        }
    }
}
