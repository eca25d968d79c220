// 该文件是 Shibie （识别） 项目的一部分。
// src/model/tflite.rs - TensorFlow Lite 推理后端
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
use tracing::{debug, info};
use tract_core::prelude::*;

use crate::{frame::InputTensor, model::Engine};

#[derive(Error, Debug)]
pub enum TfliteError {
  #[error("模型无效: {0}, 错误: {1:#}")]
  ModelInvalid(String, TractError),
  #[error("推理错误: {0:#}")]
  InferError(TractError),
  #[error("模型没有输出")]
  NoOutput,
}

impl From<TractError> for TfliteError {
  fn from(err: TractError) -> Self {
    TfliteError::InferError(err)
  }
}

impl TfliteError {
  pub fn invalid(msg: &str, e: TractError) -> Self {
    TfliteError::ModelInvalid(msg.to_string(), e)
  }
}

/// 基于 tract 的 TFLite 推理引擎
///
/// 输入为 `[1, side, side, 3]` 的 f32 张量，第一个输出展平后作为各槽位的置信度。
pub struct TfliteEngine {
  plan: TypedRunnableModel<TypedModel>,
}

impl Engine for TfliteEngine {
  type Error = TfliteError;

  fn load(model: &[u8]) -> Result<Self, Self::Error> {
    info!("解析 TFLite 模型");
    let mut reader = model;
    let model = tract_tflite::tflite()
      .model_for_read(&mut reader)
      .map_err(|e| TfliteError::invalid("无法解析模型", e))?;

    debug!("模型输入数量: {}", model.inputs.len());
    debug!("模型输出数量: {}", model.outputs.len());

    let plan = model
      .into_optimized()
      .map_err(|e| TfliteError::invalid("无法优化模型", e))?
      .into_runnable()
      .map_err(|e| TfliteError::invalid("无法创建推理计划", e))?;
    info!("推理计划创建完成");

    Ok(TfliteEngine { plan })
  }

  fn infer(&self, input: &InputTensor) -> Result<Vec<f32>, Self::Error> {
    debug!("设置模型输入: {:?}", input.shape());
    let tensor = Tensor::from_shape(&input.shape(), input.as_ref())?;

    debug!("执行模型推理");
    let outputs = self.plan.run(tvec!(tensor.into_tvalue()))?;

    let output = outputs.first().ok_or(TfliteError::NoOutput)?;
    let scores: Vec<f32> = output.to_array_view::<f32>()?.iter().copied().collect();
    debug!("输出宽度: {}", scores.len());

    Ok(scores)
  }
}
