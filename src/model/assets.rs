// 该文件是 Shibie （识别） 项目的一部分。
// src/model/assets.rs - 模型与标签资源文件
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

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, error, info};

use crate::model::ModelStoreError;

/// 只读映射的模型文件和标签文本
pub struct ModelAssets {
  model_path: PathBuf,
  model: Mmap,
  labels: String,
}

impl ModelAssets {
  pub fn open(
    model_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
  ) -> Result<Self, ModelStoreError> {
    let model_path = model_path.as_ref();
    let label_path = label_path.as_ref();

    info!("映射模型文件: {}", model_path.display());
    let file = File::open(model_path).map_err(|e| {
      error!("无法打开模型文件 {}: {}", model_path.display(), e);
      ModelStoreError::load("无法打开模型文件", e)
    })?;
    // SAFETY: 映射为只读，文件在本进程生命周期内不应被改写
    let model = unsafe { Mmap::map(&file) }
      .map_err(|e| ModelStoreError::load("无法映射模型文件", e))?;
    debug!(
      "模型文件大小: {:.2} MB",
      model.len() as f64 / (1024.0 * 1024.0)
    );

    info!("读取标签文件: {}", label_path.display());
    let labels = std::fs::read_to_string(label_path).map_err(|e| {
      error!("无法读取标签文件 {}: {}", label_path.display(), e);
      ModelStoreError::load("无法读取标签文件", e)
    })?;

    Ok(ModelAssets {
      model_path: model_path.to_path_buf(),
      model,
      labels,
    })
  }

  pub fn model_path(&self) -> &Path {
    &self.model_path
  }

  pub fn model_bytes(&self) -> &[u8] {
    &self.model
  }

  pub fn labels(&self) -> &str {
    &self.labels
  }
}
