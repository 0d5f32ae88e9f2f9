//! Requested and resolved byte ranges
//!
//! 请求的字节范围与解析后的字节范围

use std::fmt;
use std::ops::Range;

use super::error::RangeError;

/// Where a requested range starts
///
/// 请求范围的起始位置
///
/// Replaces the signed "negative means from the end" convention with an explicit tag.
///
/// 用显式标签代替"负数表示从末尾算起"的有符号约定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Offset {
    /// `n` bytes after the beginning of the file
    ///
    /// 文件开头之后 `n` 字节
    FromStart(u64),

    /// `n` bytes before the end of the file (`FromEnd(1)` is the last byte)
    ///
    /// 文件末尾之前 `n` 字节（`FromEnd(1)` 为最后一个字节）
    FromEnd(u64),
}

impl Offset {
    /// Build an offset from the signed command-line notation
    ///
    /// 从有符号的命令行表示构建偏移量
    ///
    /// ```
    /// # use fmap::Offset;
    /// assert_eq!(Offset::from_signed(42), Offset::FromStart(42));
    /// assert_eq!(Offset::from_signed(-1), Offset::FromEnd(1));
    /// assert_eq!(Offset::from_signed(i64::MIN), Offset::FromEnd(1 << 63));
    /// ```
    #[inline]
    pub fn from_signed(value: i64) -> Self {
        if value < 0 {
            Offset::FromEnd(value.unsigned_abs())
        } else {
            Offset::FromStart(value.unsigned_abs())
        }
    }

    /// Signed view of the offset, wide enough for any `u64` magnitude
    ///
    /// 偏移量的有符号表示，宽度足以容纳任何 `u64`
    #[inline]
    pub fn as_signed(&self) -> i128 {
        match *self {
            Offset::FromStart(n) => i128::from(n),
            Offset::FromEnd(n) => -i128::from(n),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::FromStart(0)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_signed())
    }
}

/// Caller intent before the file size is known
///
/// 文件大小未知之前的调用者意图
///
/// `size == None` means "up to the end of the file from the resolved offset".
///
/// `size == None` 表示"从解析后的偏移量一直到文件末尾"。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestedRange {
    offset: Offset,
    size: Option<u64>,
}

impl RequestedRange {
    #[inline]
    pub fn new(offset: Offset, size: Option<u64>) -> Self {
        Self { offset, size }
    }

    /// Build a request from the signed command-line pair
    ///
    /// 从有符号的命令行参数对构建请求
    ///
    /// Any negative `size` means "to the end of the file".
    ///
    /// 任何负数 `size` 都表示"到文件末尾"。
    #[inline]
    pub fn from_signed(offset: i64, size: i64) -> Self {
        Self {
            offset: Offset::from_signed(offset),
            size: u64::try_from(size).ok(),
        }
    }

    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Whether the file size is needed to turn this request into a [`ByteRange`]
    ///
    /// 是否需要文件大小才能把该请求转换为 [`ByteRange`]
    #[inline]
    pub fn is_end_relative(&self) -> bool {
        matches!(self.offset, Offset::FromEnd(_)) || self.size.is_none()
    }

    /// The request as-is, when it names an absolute range
    ///
    /// 当请求本身就是绝对范围时直接返回
    ///
    /// Returns `None` for end-relative requests and for ranges whose end overflows `u64`.
    ///
    /// 对于相对末尾的请求或结束位置溢出 `u64` 的范围返回 `None`。
    #[inline]
    pub fn as_absolute(&self) -> Option<ByteRange> {
        match (self.offset, self.size) {
            (Offset::FromStart(offset), Some(size)) => ByteRange::new(offset, size),
            _ => None,
        }
    }
}

/// Absolute, validated byte range `[offset, offset + size)`
///
/// 绝对的、已验证的字节范围 `[offset, offset + size)`
///
/// When produced by [`resolve`], `offset + size <= file_size` always holds.
///
/// 由 [`resolve`] 产生时，始终满足 `offset + size <= file_size`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ByteRangeFields")
)]
pub struct ByteRange {
    offset: u64,
    size: u64,
}

/// Unvalidated wire form of [`ByteRange`]; deserialization goes through [`ByteRange::new`]
///
/// [`ByteRange`] 未经验证的序列化形式；反序列化经由 [`ByteRange::new`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ByteRangeFields {
    offset: u64,
    size: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<ByteRangeFields> for ByteRange {
    type Error = String;

    fn try_from(fields: ByteRangeFields) -> Result<Self, Self::Error> {
        ByteRange::new(fields.offset, fields.size).ok_or_else(|| {
            format!(
                "byte range offset {} + size {} overflows u64",
                fields.offset, fields.size
            )
        })
    }
}

impl ByteRange {
    /// Create a range, or `None` if `offset + size` overflows
    ///
    /// 创建范围；若 `offset + size` 溢出则返回 `None`
    #[inline]
    pub fn new(offset: u64, size: u64) -> Option<Self> {
        offset.checked_add(size)?;
        Some(Self { offset, size })
    }

    #[inline]
    pub(crate) fn from_parts_unchecked(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Exclusive end position
    ///
    /// 结束位置（不包含）
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn as_range(&self) -> Range<u64> {
        self.offset..self.end()
    }
}

impl From<ByteRange> for Range<u64> {
    #[inline]
    fn from(range: ByteRange) -> Self {
        range.as_range()
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {})", self.offset, self.end())
    }
}

/// Resolve a request against the size of the file it targets
///
/// 根据目标文件的大小解析请求
///
/// Pure function of its inputs. Sizes that run past the end of the file are rejected,
/// never clamped.
///
/// 纯函数。超出文件末尾的大小会被拒绝，而不是被截断。
///
/// # Errors
/// - [`RangeError::InvalidFileSize`] if `file_size == 0`
/// - [`RangeError::OffsetOutOfRange`] if the offset resolves outside `[0, file_size]`
/// - [`RangeError::SizeExceedsRemainder`] if `offset + size > file_size`
///
/// # Examples
///
/// ```
/// # use fmap::{resolve, ByteRange, RequestedRange};
/// let range = resolve(RequestedRange::from_signed(-100, -1), 4096).unwrap();
/// assert_eq!(range, ByteRange::new(3996, 100).unwrap());
///
/// assert!(resolve(RequestedRange::from_signed(5, 20), 10).is_err());
/// ```
pub fn resolve(requested: RequestedRange, file_size: u64) -> Result<ByteRange, RangeError> {
    if file_size == 0 {
        return Err(RangeError::InvalidFileSize { file_size });
    }

    let offset = match requested.offset {
        Offset::FromStart(n) if n <= file_size => n,
        Offset::FromEnd(n) if n <= file_size => file_size - n,
        other => {
            return Err(RangeError::OffsetOutOfRange {
                offset: other.as_signed(),
                file_size,
            });
        }
    };

    let remaining = file_size - offset;
    let size = requested.size.unwrap_or(remaining);
    if size > remaining {
        return Err(RangeError::SizeExceedsRemainder {
            offset,
            size,
            file_size,
            remaining,
        });
    }

    Ok(ByteRange::from_parts_unchecked(offset, size))
}
