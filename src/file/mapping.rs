//! Open target handle and its shared mapping
//!
//! 打开的目标句柄及其共享映射

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::{MmapMut, MmapOptions};

use super::error::{Error, Result};
use super::window::MapWindow;

/// Kind of file-system object behind a [`Target`]
///
/// [`Target`] 背后的文件系统对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    CharDevice,
    BlockDevice,
    Fifo,
    Symlink,
    Socket,
    Unknown,
}

impl FileKind {
    fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            FileKind::Regular
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_char_device() {
            FileKind::CharDevice
        } else if file_type.is_block_device() {
            FileKind::BlockDevice
        } else if file_type.is_fifo() {
            FileKind::Fifo
        } else if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Unknown
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::Regular => "FILE",
            FileKind::Directory => "DIR",
            FileKind::CharDevice => "CHR DEV",
            FileKind::BlockDevice => "BLK DEV",
            FileKind::Fifo => "PIPE",
            FileKind::Symlink => "LNK",
            FileKind::Socket => "SOCK",
            FileKind::Unknown => "UNKNOWN",
        })
    }
}

/// File or device node opened for mapping
///
/// 为映射而打开的文件或设备节点
///
/// Opened read+write with `O_SYNC`. Dropping the target closes the handle silently;
/// [`Target::close`] closes it explicitly and reports the outcome.
///
/// 以读写方式并带 `O_SYNC` 打开。丢弃时静默关闭句柄；
/// [`Target::close`] 显式关闭并报告结果。
#[derive(Debug)]
pub struct Target {
    file: File,
    path: PathBuf,
}

impl Target {
    /// Open `path` for reading and writing
    ///
    /// 以读写方式打开 `path`
    ///
    /// # Errors
    /// [`Error::Open`] if the path cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size reported by `fstat` together with the object kind
    ///
    /// `fstat` 报告的大小及对象类型
    ///
    /// Device nodes and pipes usually report 0.
    ///
    /// 设备节点和管道通常报告 0。
    ///
    /// # Errors
    /// [`Error::Stat`] if `fstat` fails.
    pub fn size(&self) -> Result<(u64, FileKind)> {
        let metadata = self
            .file
            .metadata()
            .map_err(|source| Error::Stat { source })?;
        let kind = FileKind::from_file_type(metadata.file_type());
        debug!("File size (type: {kind}): {} bytes", metadata.len());
        Ok((metadata.len(), kind))
    }

    /// Map `window` of this target, shared and writable
    ///
    /// 以共享可写方式映射该目标的 `window`
    ///
    /// # Errors
    /// - [`Error::WindowTooLarge`] if the window does not fit in `usize`
    /// - [`Error::MapFailed`] if `mmap` fails
    pub fn map(&self, window: MapWindow) -> Result<Mapping> {
        Mapping::new(&self.file, window)
    }

    /// Close the handle, reporting a failing `close(2)`
    ///
    /// 关闭句柄，并报告 `close(2)` 的失败
    pub fn close(self) -> Result<()> {
        let fd = self.file.into_raw_fd();
        // SAFETY: `fd` was just released from an owned `File` and is closed exactly once here.
        if unsafe { libc::close(fd) } == -1 {
            return Err(Error::Close {
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

/// Shared writable mapping of a [`MapWindow`]
///
/// [`MapWindow`] 的共享可写映射
///
/// Owns the whole padded region; [`view`](Mapping::view) and
/// [`view_mut`](Mapping::view_mut) only ever hand out the requested bytes.
/// Writes go through to the file (`MAP_SHARED`, never copy-on-write).
///
/// 拥有整个带填充的区域；[`view`](Mapping::view) 和 [`view_mut`](Mapping::view_mut)
/// 只暴露请求的字节。写入会直达文件（`MAP_SHARED`，而不是写时复制）。
///
/// The region is unmapped by [`unmap`](Mapping::unmap), or on drop if an error path
/// skips it. Because `unmap` consumes the mapping, it cannot run twice.
///
/// 区域由 [`unmap`](Mapping::unmap) 解除映射；若错误路径跳过了它，则在 drop 时解除。
/// 由于 `unmap` 会消耗映射，因此不可能执行两次。
pub struct Mapping {
    mmap: MmapMut,
    window: MapWindow,
}

impl Mapping {
    fn new(file: &File, window: MapWindow) -> Result<Self> {
        let len = usize::try_from(window.map_len()).map_err(|_| Error::WindowTooLarge {
            len: window.map_len(),
        })?;

        debug!(
            "Mapping: OFFSET {} (aligned to {}, page {}), SIZE {}",
            window.range().offset(),
            window.map_offset(),
            window.page_size(),
            window.range().size()
        );

        // SAFETY: the mapped bytes are only reached through `view`/`view_mut`, which borrow
        // the `Mapping`. Modification of the file by other processes is not guarded against.
        let mmap = unsafe {
            MmapOptions::new()
                .offset(window.map_offset())
                .len(len)
                .map_mut(file)
        }
        .map_err(|source| Error::MapFailed {
            offset: window.map_offset(),
            len: window.map_len(),
            source,
        })?;

        Ok(Self { mmap, window })
    }

    #[inline]
    pub fn window(&self) -> MapWindow {
        self.window
    }

    /// Number of requested bytes
    ///
    /// 请求的字节数
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len() - self.window.pad() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The requested bytes
    ///
    /// 请求的字节
    #[inline]
    pub fn view(&self) -> &[u8] {
        &self.mmap[self.window.pad() as usize..]
    }

    /// The requested bytes, writable
    ///
    /// 请求的字节（可写）
    #[inline]
    pub fn view_mut(&mut self) -> &mut [u8] {
        let pad = self.window.pad() as usize;
        &mut self.mmap[pad..]
    }

    /// Flush the region to the file and unmap it
    ///
    /// 将区域刷新到文件并解除映射
    ///
    /// The region is released even when the flush fails; the failure is returned.
    ///
    /// 即使刷新失败，区域也会被释放；失败会被返回。
    pub fn unmap(self) -> Result<()> {
        let flushed = self.mmap.flush();
        drop(self.mmap);
        flushed.map_err(|source| Error::Unmap { source })
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("window", &self.window)
            .field("mmap", &"MmapMut")
            .finish()
    }
}
