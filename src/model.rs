// 该文件是 Shibie （识别） 项目的一部分。
// src/model.rs - 推理引擎与模型存储
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

use crate::frame::InputTensor;

/// 推理引擎句柄
///
/// `load` 从模型字节构建可运行的引擎，`infer` 对一个输入张量执行一次推理，
/// 返回每个输出槽位的置信度。实现不要求可重入。
pub trait Engine: Sized {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load(model: &[u8]) -> Result<Self, Self::Error>;
  fn infer(&self, input: &InputTensor) -> Result<Vec<f32>, Self::Error>;
}

mod assets;
mod labels;
mod store;
pub use self::assets::ModelAssets;
pub use self::labels::LabelList;
pub use self::store::{ModelStore, ModelStoreError};

#[cfg(feature = "tflite")]
mod tflite;
#[cfg(feature = "tflite")]
pub use self::tflite::{TfliteEngine, TfliteError};
