//! `cat` over `mmap`
//!
//! 基于 `mmap` 的 `cat`
//!
//! Maps a byte range of a file, or of a device node such as `/dev/mem`, and performs one
//! bulk transfer: the mapped bytes go to an output stream, or, when the input stream already
//! holds data, the input is copied into the mapping in place.
//!
//! 映射文件（或 `/dev/mem` 这类设备节点）的一个字节范围并执行一次批量传输：
//! 映射的字节被写到输出流；或者当输入流已有数据时，将输入原地复制到映射中。
//!
//! # Features
//!
//! - **Byte-range addressing**: offsets relative to the start or to the end of the file
//! - **Page alignment**: arbitrary offsets are mapped through a page-aligned window
//! - **Direction inference**: non-blocking probe of the input decides read vs. write
//! - **Scoped teardown**: mapping and handle are released on every exit path
//!
//! # 特性
//!
//! - **字节范围寻址**：偏移量可相对文件开头或结尾
//! - **页对齐**：任意偏移通过页对齐的窗口映射
//! - **方向推断**：对输入的非阻塞探测决定读或写
//! - **作用域释放**：映射与句柄在每条退出路径上都会被释放
//!
//! # Quick Start
//!
//! ```
//! use fmap::{run, Request, RequestedRange, Result};
//! # use fmap::InputProbe;
//! # use tempfile::tempdir;
//! # struct NoInput;
//! # impl InputProbe for NoInput {
//! #     fn pending(&self) -> std::io::Result<usize> { Ok(0) }
//! # }
//! # fn main() -> Result<()> {
//! # let dir = tempdir()?;
//! # let path = dir.path().join("data.bin");
//! # std::fs::write(&path, b"hello, world")?;
//!
//! // Bytes [7; 12) of the file
//! // 文件的字节 [7; 12)
//! let request = Request::new(&path, RequestedRange::from_signed(7, 5));
//! let mut out = Vec::new();
//! run(&request, &NoInput, &mut std::io::empty(), &mut out)?;
//! assert_eq!(out, b"world");
//! # Ok(())
//! # }
//! ```

mod file;
pub mod logging;
mod session;

pub use file::{
    ByteRange, Error, ErrorCategory, FdProbe, FileKind, InputProbe, MapWindow, Mapping, Offset,
    RangeError, RequestedRange, Result, Target, Transfer, TransferDirection, copy, page_size,
    resolve, select,
};
pub use session::{Request, run};
