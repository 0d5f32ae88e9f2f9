//! Page-aligned mapping window
//!
//! 页对齐的映射窗口

use std::io;
use std::num::NonZeroU64;

use super::error::{Error, Result};
use super::range::ByteRange;

/// Page-aligned window covering a [`ByteRange`]
///
/// 覆盖 [`ByteRange`] 的页对齐窗口
///
/// `mmap` only accepts page-aligned file offsets, so the window starts at the
/// offset rounded down to a page boundary and is `pad` bytes longer than the
/// requested range. The requested bytes live at `[pad, pad + size)` inside it.
///
/// `mmap` 只接受页对齐的文件偏移，因此窗口从向下取整到页边界的偏移开始，
/// 比请求范围多 `pad` 字节。请求的字节位于窗口内的 `[pad, pad + size)`。
///
/// ```
/// # use fmap::{ByteRange, MapWindow};
/// # use std::num::NonZeroU64;
/// let range = ByteRange::new(5000, 100).unwrap();
/// let window = MapWindow::new(range, NonZeroU64::new(4096).unwrap());
///
/// assert_eq!(window.map_offset(), 4096);
/// assert_eq!(window.pad(), 904);
/// assert_eq!(window.map_len(), 1004);
/// assert_eq!(window.view(), 904..1004);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapWindow {
    range: ByteRange,
    page_size: NonZeroU64,
    pad: u64,
}

impl MapWindow {
    /// Compute the window for `range` with the given page size
    ///
    /// 根据给定页大小计算 `range` 的窗口
    #[inline]
    pub fn new(range: ByteRange, page_size: NonZeroU64) -> Self {
        let pad = range.offset() % page_size.get();
        Self {
            range,
            page_size,
            pad,
        }
    }

    /// The logical range this window covers
    ///
    /// 窗口覆盖的逻辑范围
    #[inline]
    pub fn range(&self) -> ByteRange {
        self.range
    }

    #[inline]
    pub fn page_size(&self) -> NonZeroU64 {
        self.page_size
    }

    /// Bytes between the page boundary and the requested offset
    ///
    /// 页边界与请求偏移之间的字节数
    #[inline]
    pub fn pad(&self) -> u64 {
        self.pad
    }

    /// File offset the mapping starts at (a multiple of the page size)
    ///
    /// 映射起始的文件偏移（页大小的整数倍）
    #[inline]
    pub fn map_offset(&self) -> u64 {
        self.range.offset() - self.pad
    }

    /// Length of the whole mapped region, padding included
    ///
    /// 整个映射区域的长度（包含填充）
    #[inline]
    pub fn map_len(&self) -> u64 {
        self.range.size() + self.pad
    }

    /// Position of the requested bytes inside the mapped region
    ///
    /// 请求字节在映射区域内的位置
    #[inline]
    pub fn view(&self) -> std::ops::Range<u64> {
        self.pad..self.map_len()
    }
}

/// Page size of the host
///
/// 主机的页大小
pub fn page_size() -> Result<NonZeroU64> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(raw)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| Error::PageSize {
            source: io::Error::last_os_error(),
        })
}
