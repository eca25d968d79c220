// 该文件是 Shibie （识别） 项目的一部分。
// src/encode.rs - 图像到输入张量的编码
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use thiserror::Error;
use tracing::debug;

use crate::frame::{InputTensor, PixelSource, RGB_CHANNELS};

pub const IMAGE_MEAN: f32 = 128.0;
pub const IMAGE_STD: f32 = 128.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
  #[error("图像尺寸无效: {width}x{height}, 目标边长 {side}")]
  InvalidImage { width: u32, height: u32, side: u32 },
}

#[inline]
fn normalize(channel: u32) -> f32 {
  ((channel & 0xFF) as f32 - IMAGE_MEAN) / IMAGE_STD
}

/// 最近邻采样坐标，取目标像素中心对应的源像素
#[inline]
fn nearest(dst: u32, src_len: u32, side: u32) -> u32 {
  let pos = (2 * dst as u64 + 1) * src_len as u64 / (2 * side as u64);
  (pos as u32).min(src_len - 1)
}

/// 将图像缩放到 `side x side` 并编码为归一化的 RGB 张量
///
/// 缩放使用不带滤波的最近邻采样；每个通道按 `(c - 128) / 128` 归一化，
/// 顺序为 R、G、B。
pub fn encode<I: PixelSource + ?Sized>(image: &I, side: u32) -> Result<InputTensor, EncodeError> {
  let (width, height) = (image.width(), image.height());
  if width == 0 || height == 0 || side == 0 {
    return Err(EncodeError::InvalidImage {
      width,
      height,
      side,
    });
  }

  debug!(
    "布局尺寸: ({} {}) ---- {}",
    width,
    height,
    side as usize * side as usize
  );

  let columns: Vec<u32> = (0..side).map(|x| nearest(x, width, side)).collect();
  let mut data = Vec::with_capacity(side as usize * side as usize * RGB_CHANNELS);

  for i in 0..side {
    let src_y = nearest(i, height, side);
    for &src_x in &columns {
      let value = image.argb(src_x, src_y);
      data.push(normalize(value >> 16));
      data.push(normalize(value >> 8));
      data.push(normalize(value));
    }
  }

  Ok(InputTensor::from_parts(side, data))
}
