//! Range resolution, page-aligned mapping and bulk copy
//!
//! 范围解析、页对齐映射与批量复制
//!
//! The pieces of one `fmap` run, leaves first:
//! - [`resolve`]: turns a [`RequestedRange`] into an absolute [`ByteRange`] within the file
//! - [`MapWindow`]: page-aligned window around a [`ByteRange`]
//! - [`Target`] / [`Mapping`]: the open handle and the shared mapping of a window
//! - [`select`]: picks a [`TransferDirection`] by probing the input without blocking
//! - [`copy`]: moves the bytes between the mapped view and a stream
//!
//! 一次 `fmap` 运行的组成部分（从底层开始）：
//! - [`resolve`]：把 [`RequestedRange`] 转换为文件内的绝对 [`ByteRange`]
//! - [`MapWindow`]：围绕 [`ByteRange`] 的页对齐窗口
//! - [`Target`] / [`Mapping`]：打开的句柄以及窗口的共享映射
//! - [`select`]：通过非阻塞探测输入来选择 [`TransferDirection`]
//! - [`copy`]：在映射视图与数据流之间移动字节
//!
//! ```
//! # use fmap::{copy, page_size, resolve, MapWindow, RequestedRange, Target, TransferDirection, Result};
//! # use tempfile::tempdir;
//! # fn main() -> Result<()> {
//! # let dir = tempdir()?;
//! # let path = dir.path().join("data.bin");
//! # std::fs::write(&path, b"0123456789")?;
//! let target = Target::open(&path)?;
//! let (file_size, _kind) = target.size()?;
//!
//! // Last four bytes
//! // 最后四个字节
//! let range = resolve(RequestedRange::from_signed(-4, -1), file_size)?;
//! let mut mapping = target.map(MapWindow::new(range, page_size()?))?;
//!
//! let mut out = Vec::new();
//! copy(TransferDirection::ReadFromMapping, mapping.view_mut(), &mut std::io::empty(), &mut out)?;
//! assert_eq!(out, b"6789");
//!
//! mapping.unmap()?;
//! target.close()?;
//! # Ok(())
//! # }
//! ```

mod copy;
mod direction;
mod error;
mod mapping;
mod range;
mod window;


// Re-export public API
// 重新导出公共 API
pub use copy::{Transfer, copy};
pub use direction::{FdProbe, InputProbe, TransferDirection, select};
pub use error::{Error, ErrorCategory, RangeError, Result};
pub use mapping::{FileKind, Mapping, Target};
pub use range::{ByteRange, Offset, RequestedRange, resolve};
pub use window::{MapWindow, page_size};
