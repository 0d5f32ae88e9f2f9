//! One invocation: open, resolve, map, transfer, unmap, close
//!
//! 一次调用：打开、解析、映射、传输、解除映射、关闭

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::file::{
    FileKind, InputProbe, MapWindow, RequestedRange, Result, Target, Transfer, copy, page_size,
    resolve, select,
};

/// What to map and where
///
/// 映射什么以及映射哪里
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    path: PathBuf,
    range: RequestedRange,
}

impl Request {
    pub fn new(path: impl Into<PathBuf>, range: RequestedRange) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn range(&self) -> RequestedRange {
        self.range
    }
}

/// Run one transfer for `request`
///
/// 为 `request` 执行一次传输
///
/// Resources are released in reverse acquisition order on every path: the mapping is
/// unmapped even when the copy fails, the handle is closed even when mapping fails.
/// Unmap/close failures are only logged as warnings and never change the result.
///
/// 在所有路径上按获取的逆序释放资源：即使复制失败也会解除映射，即使映射失败也会关闭句柄。
/// 解除映射/关闭的失败只记录为警告，不会改变结果。
///
/// Regular files are always checked against their size. For other objects (device nodes
/// report a size of 0) an absolute request, non-negative offset and explicit size, is
/// mapped as given.
///
/// 普通文件始终会根据其大小进行检查。对于其他对象（设备节点报告的大小为 0），
/// 绝对请求（非负偏移且显式大小）将按原样映射。
pub fn run<P, R, W>(request: &Request, probe: &P, input: &mut R, output: &mut W) -> Result<Transfer>
where
    P: InputProbe + ?Sized,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    debug!(
        "Args: FILE {}, OFFSET {}, SIZE {:?}",
        request.path.display(),
        request.range.offset(),
        request.range.size()
    );

    info!("Opening '{}': ...", request.path.display());
    let target = Target::open(&request.path)
        .inspect_err(|_| error!("Opening '{}': FAILED", request.path.display()))?;

    let outcome = map_and_copy(&target, request.range, probe, input, output);

    info!("Closing file: ...");
    if let Err(err) = target.close() {
        warn!("Closing file: FAILED ({err})");
    }

    outcome
}

fn map_and_copy<P, R, W>(
    target: &Target,
    requested: RequestedRange,
    probe: &P,
    input: &mut R,
    output: &mut W,
) -> Result<Transfer>
where
    P: InputProbe + ?Sized,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let (file_size, kind) = target.size()?;
    let range = match requested.as_absolute() {
        Some(range) if kind != FileKind::Regular => range,
        _ => {
            info!("Matching OFFSET/SIZE to FILE: ...");
            resolve(requested, file_size)
                .inspect_err(|_| error!("Matching OFFSET/SIZE to FILE: FAILED"))?
        }
    };

    info!("Mapping FILE (Range: {range}): ...");
    let window = MapWindow::new(range, page_size()?);
    let mut mapping = target
        .map(window)
        .inspect_err(|_| error!("Mapping FILE (Range: {range}): FAILED"))?;

    let direction = select(probe);
    info!("{direction}: ...");
    let outcome = copy(direction, mapping.view_mut(), input, output);
    match &outcome {
        Ok(transfer) if transfer.is_short() => info!(
            "{direction}: input ended after {} of {} bytes",
            transfer.transferred(),
            transfer.capacity()
        ),
        Ok(transfer) => debug!("{direction}: {} bytes", transfer.transferred()),
        Err(_) => error!("{direction}: FAILED"),
    }

    info!("Unmapping memory: ...");
    if let Err(err) = mapping.unmap() {
        warn!("Unmapping memory: FAILED ({err})");
    }

    outcome
}
