//! Error types for fmap
//!
//! fmap 的错误类型

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::direction::TransferDirection;

/// Range resolution error
///
/// 范围解析错误
///
/// Returned by [`resolve`](super::resolve) when a requested offset/size pair does not fit the
/// file it is resolved against. Every variant carries the offending values.
///
/// 当请求的偏移/大小与文件不匹配时由 [`resolve`](super::resolve) 返回，每个变体都携带出错的值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The target has no usable size (pipe, socket, empty file, ...)
    ///
    /// 目标没有可用的大小（管道、套接字、空文件等）
    #[error("wrong FILE size ({file_size}): FILE may not be a regular file with a size (PIPE/...)")]
    InvalidFileSize { file_size: u64 },

    /// The offset lands outside `[0, file_size]`
    ///
    /// 偏移量落在 `[0, file_size]` 之外
    #[error("wrong OFFSET ({offset}) w.r.t. the FILE size ({file_size})")]
    OffsetOutOfRange { offset: i128, file_size: u64 },

    /// The size runs past the end of the file
    ///
    /// 大小超出文件末尾
    #[error(
        "wrong SIZE ({size}) w.r.t. the OFFSET ({offset}) and the FILE size ({file_size}) (size remaining: {remaining})"
    )]
    SizeExceedsRemainder {
        offset: u64,
        size: u64,
        file_size: u64,
        remaining: u64,
    },
}

/// Error type for fmap operations
///
/// fmap 操作的错误类型
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cannot open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Range(#[from] RangeError),

    /// `fstat` on the opened target failed
    ///
    /// 对已打开目标的 `fstat` 失败
    #[error("cannot retrieve FILE size: {source}")]
    Stat { source: io::Error },

    #[error("cannot query the page size: {source}")]
    PageSize { source: io::Error },

    /// The padded mapping window does not fit in the address space
    ///
    /// 对齐后的映射窗口超出地址空间
    #[error("mapping window of {len} bytes does not fit in the address space")]
    WindowTooLarge { len: u64 },

    #[error("mmap of {len} bytes at offset {offset} failed: {source}")]
    MapFailed {
        offset: u64,
        len: u64,
        source: io::Error,
    },

    /// Flushing the region before unmapping failed; the region is released regardless
    ///
    /// 解除映射前刷新区域失败；区域仍会被释放
    #[error("flush before unmap failed: {source}")]
    Unmap { source: io::Error },

    #[error("{direction} failed after {transferred} bytes: {source}")]
    Transfer {
        direction: TransferDirection,
        transferred: u64,
        source: io::Error,
    },

    #[error("close failed: {source}")]
    Close { source: io::Error },
}

/// Failure class of an [`Error`], used for reporting and exit handling
///
/// [`Error`] 的失败类别，用于报告和退出处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Open,
    Range,
    Map,
    Transfer,
    /// Unmap/close after the main work; callers only warn about these
    ///
    /// 主要工作完成后的 unmap/close 失败；调用者只需警告
    Teardown,
}

impl Error {
    /// Classify this error
    ///
    /// 对错误进行分类
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Open { .. } => ErrorCategory::Open,
            Error::Stat { .. } | Error::Range(_) => ErrorCategory::Range,
            Error::PageSize { .. } | Error::WindowTooLarge { .. } | Error::MapFailed { .. } => {
                ErrorCategory::Map
            }
            Error::Io(_) | Error::Transfer { .. } => ErrorCategory::Transfer,
            Error::Unmap { .. } | Error::Close { .. } => ErrorCategory::Teardown,
        }
    }
}

/// Convert from Error to io::Error for compatibility
///
/// 从 Error 转换到 io::Error 以保持兼容性
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(io_err) => io_err,
            Error::Open { ref source, .. }
            | Error::Stat { ref source }
            | Error::PageSize { ref source }
            | Error::MapFailed { ref source, .. }
            | Error::Unmap { ref source }
            | Error::Transfer { ref source, .. }
            | Error::Close { ref source } => io::Error::new(source.kind(), err.to_string()),
            Error::Range(_) | Error::WindowTooLarge { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
            }
        }
    }
}

/// Result type alias using our custom Error type
///
/// 使用自定义 Error 类型的 Result 类型别名
pub type Result<T, E = Error> = std::result::Result<T, E>;
