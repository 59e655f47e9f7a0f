#![forbid(unsafe_code)]

//! `"WxH"` size tokens and their block dimensions.
//!
//! Size tokens are user/author data and are never trusted: anything that
//! does not parse degrades to `1x1`, and parsed dimensions are clamped to
//! `[MIN_BLOCKS, MAX_BLOCKS]`. Parsing never fails.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Smallest extent of a widget along either axis, in blocks.
pub const MIN_BLOCKS: u8 = 1;

/// Largest extent of a widget along either axis, in blocks.
pub const MAX_BLOCKS: u8 = 3;

/// Widget dimensions in blocks.
///
/// Both extents are always within `[MIN_BLOCKS, MAX_BLOCKS]`.
/// Serializes as the canonical `"WxH"` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockSize {
    w: u8,
    h: u8,
}

impl BlockSize {
    /// The `1x1` fallback size.
    pub const ONE: Self = Self { w: 1, h: 1 };

    /// Create a block size, clamping both extents.
    #[must_use]
    pub const fn new(w: u8, h: u8) -> Self {
        Self {
            w: clamp_extent(w as u32),
            h: clamp_extent(h as u32),
        }
    }

    /// Width in blocks.
    #[inline]
    #[must_use]
    pub const fn w(self) -> u8 {
        self.w
    }

    /// Height in blocks.
    #[inline]
    #[must_use]
    pub const fn h(self) -> u8 {
        self.h
    }

    /// Number of blocks covered (`w * h`).
    #[inline]
    #[must_use]
    pub const fn block_count(self) -> u32 {
        self.w as u32 * self.h as u32
    }

    /// Parse a `"WxH"` token, degrading to `1x1` on malformed input.
    ///
    /// Surrounding whitespace is ignored and the separator may be `x` or
    /// `X`. Out-of-range extents are clamped rather than rejected, so
    /// `"0x2"` is `1x2` and `"9x9"` is `3x3`.
    #[must_use]
    pub fn parse_lossy(token: &str) -> Self {
        let Some((w, h)) = token.trim().split_once(['x', 'X']) else {
            return Self::ONE;
        };
        match (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
            (Ok(w), Ok(h)) => Self {
                w: clamp_extent(w),
                h: clamp_extent(h),
            },
            _ => Self::ONE,
        }
    }
}

const fn clamp_extent(raw: u32) -> u8 {
    if raw < MIN_BLOCKS as u32 {
        MIN_BLOCKS
    } else if raw > MAX_BLOCKS as u32 {
        MAX_BLOCKS
    } else {
        raw as u8
    }
}

/// Parse a size token into block dimensions. Never fails.
#[must_use]
pub fn size_to_blocks(token: &str) -> BlockSize {
    BlockSize::parse_lossy(token)
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

impl FromStr for BlockSize {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lossy(s))
    }
}

impl Serialize for BlockSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lossy(&raw))
    }
}
