// 该文件是 Shibie （识别） 项目的一部分。
// src/frame.rs - 图像帧与输入张量定义
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

#[cfg(feature = "read_image_file")]
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

pub const RGB_CHANNELS: usize = 3;

/// 可按像素读取的图像来源
///
/// 像素以 32 位 ARGB 打包形式返回：R 位于 16–23 位，G 位于 8–15 位，B 位于 0–7 位。
/// 透明通道不参与推理。
pub trait PixelSource {
  fn width(&self) -> u32;
  fn height(&self) -> u32;
  fn argb(&self, x: u32, y: u32) -> u32;
}

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
  (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// 以打包 ARGB 像素存储的帧，行优先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbFrame {
  width: u32,
  height: u32,
  data: Box<[u32]>,
}

impl ArgbFrame {
  pub fn new(width: u32, height: u32, data: Vec<u32>) -> Self {
    if data.len() != width as usize * height as usize {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        width as usize * height as usize,
        data.len()
      );
    }

    Self {
      width,
      height,
      data: data.into_boxed_slice(),
    }
  }

  pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u32) -> Self {
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
      for x in 0..width {
        data.push(f(x, y));
      }
    }
    Self::new(width, height, data)
  }

  pub fn pixels(&self) -> &[u32] {
    &self.data
  }
}

impl PixelSource for ArgbFrame {
  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn argb(&self, x: u32, y: u32) -> u32 {
    self.data[y as usize * self.width as usize + x as usize]
  }
}

#[cfg(feature = "read_image_file")]
impl PixelSource for RgbImage {
  fn width(&self) -> u32 {
    self.dimensions().0
  }

  fn height(&self) -> u32 {
    self.dimensions().1
  }

  fn argb(&self, x: u32, y: u32) -> u32 {
    let pixel = self.get_pixel(x, y);
    pack_argb(0xFF, pixel[0], pixel[1], pixel[2])
  }
}

#[cfg(feature = "read_image_file")]
impl PixelSource for RgbaImage {
  fn width(&self) -> u32 {
    self.dimensions().0
  }

  fn height(&self) -> u32 {
    self.dimensions().1
  }

  fn argb(&self, x: u32, y: u32) -> u32 {
    let pixel = self.get_pixel(x, y);
    pack_argb(pixel[3], pixel[0], pixel[1], pixel[2])
  }
}

#[cfg(feature = "read_image_file")]
impl PixelSource for DynamicImage {
  fn width(&self) -> u32 {
    GenericImageView::width(self)
  }

  fn height(&self) -> u32 {
    GenericImageView::height(self)
  }

  fn argb(&self, x: u32, y: u32) -> u32 {
    let pixel = self.get_pixel(x, y);
    pack_argb(pixel[3], pixel[0], pixel[1], pixel[2])
  }
}

/// 模型输入张量，NHWC 布局展平后的 f32 序列
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
  side: u32,
  data: Box<[f32]>,
}

impl InputTensor {
  pub(crate) fn from_parts(side: u32, data: Vec<f32>) -> Self {
    debug_assert_eq!(data.len(), side as usize * side as usize * RGB_CHANNELS);
    Self {
      side,
      data: data.into_boxed_slice(),
    }
  }

  pub fn side(&self) -> u32 {
    self.side
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// `[batch, height, width, channels]`
  pub fn shape(&self) -> [usize; 4] {
    let side = self.side as usize;
    [1, side, side, RGB_CHANNELS]
  }

  /// 按本机字节序序列化
  pub fn to_ne_bytes(&self) -> Vec<u8> {
    self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
  }
}

impl AsRef<[f32]> for InputTensor {
  fn as_ref(&self) -> &[f32] {
    &self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[cfg(feature = "read_image_file")]
  #[test]
  fn rgb_image_packs_opaque_argb() {
    let image = RgbImage::from_pixel(2, 1, image::Rgb([0x12, 0x34, 0x56]));
    assert_eq!(image.argb(1, 0), 0xFF12_3456);
  }

  #[test]
  fn argb_frame_is_row_major() {
    let frame = ArgbFrame::from_fn(3, 2, |x, y| y * 10 + x);
    assert_eq!(frame.pixels(), &[0, 1, 2, 10, 11, 12]);
    assert_eq!(frame.argb(2, 1), 12);
  }

  #[test]
  #[should_panic]
  fn argb_frame_rejects_wrong_length() {
    ArgbFrame::new(2, 2, vec![0; 3]);
  }

  #[test]
  fn tensor_bytes_use_native_order() {
    let tensor = InputTensor::from_parts(1, vec![-1.0, 0.0, 0.5]);
    let bytes = tensor.to_ne_bytes();
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[0..4], &(-1.0f32).to_ne_bytes());
    assert_eq!(&bytes[8..12], &0.5f32.to_ne_bytes());
  }
}
