// 该文件是 Shibie （识别） 项目的一部分。
// src/model/store.rs - 模型存储与生命周期
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
use tracing::{debug, error, info, warn};

use crate::model::{Engine, LabelList, ModelAssets};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ModelStoreError {
  #[error("模型加载错误: {context}: {source}")]
  ModelLoad {
    context: String,
    #[source]
    source: BoxError,
  },
  #[error("输入边长无效: {0}")]
  InvalidInputSide(u32),
  #[error("模型已关闭")]
  UseAfterClose,
}

impl ModelStoreError {
  pub fn load(context: &str, source: impl Into<BoxError>) -> Self {
    ModelStoreError::ModelLoad {
      context: context.to_string(),
      source: source.into(),
    }
  }
}

enum EngineState<E> {
  Loaded(E),
  Closed,
}

/// 持有推理引擎与标签列表，创建一次、关闭一次
pub struct ModelStore<E> {
  state: EngineState<E>,
  labels: LabelList,
  input_side: u32,
}

impl<E: Engine> ModelStore<E> {
  /// 解析模型字节与标签文本
  ///
  /// `input_side` 不与模型实际输入形状做校验。
  pub fn load(model: &[u8], labels: &str, input_side: u32) -> Result<Self, ModelStoreError> {
    info!("加载模型, 大小: {:.2} MB", model.len() as f64 / (1024.0 * 1024.0));
    let engine = E::load(model).map_err(|e| {
      error!("创建推理引擎失败: {}", e);
      ModelStoreError::load("无法创建推理引擎", e)
    })?;
    let labels = LabelList::parse(labels);
    Self::from_engine(engine, labels, input_side)
  }

  pub fn open(assets: &ModelAssets, input_side: u32) -> Result<Self, ModelStoreError> {
    Self::load(assets.model_bytes(), assets.labels(), input_side)
  }

  pub fn from_engine(
    engine: E,
    labels: LabelList,
    input_side: u32,
  ) -> Result<Self, ModelStoreError> {
    if input_side == 0 {
      error!("输入边长必须为正数");
      return Err(ModelStoreError::InvalidInputSide(input_side));
    }

    debug!("标签数量: {}", labels.len());
    debug!("输入尺寸: {}x{}", input_side, input_side);
    info!("模型加载完成");

    Ok(ModelStore {
      state: EngineState::Loaded(engine),
      labels,
      input_side,
    })
  }
}

impl<E> ModelStore<E> {
  pub fn engine(&self) -> Result<&E, ModelStoreError> {
    match &self.state {
      EngineState::Loaded(engine) => Ok(engine),
      EngineState::Closed => Err(ModelStoreError::UseAfterClose),
    }
  }

  pub fn labels(&self) -> &LabelList {
    &self.labels
  }

  pub fn input_side(&self) -> u32 {
    self.input_side
  }

  pub fn is_closed(&self) -> bool {
    matches!(self.state, EngineState::Closed)
  }

  /// 释放推理引擎，重复关闭不做任何事
  pub fn close(&mut self) {
    match std::mem::replace(&mut self.state, EngineState::Closed) {
      EngineState::Loaded(engine) => {
        drop(engine);
        info!("模型已释放");
      }
      EngineState::Closed => warn!("模型已经关闭"),
    }
  }
}
