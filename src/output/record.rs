// 该文件是 Shibie （识别） 项目的一部分。
// src/output/record.rs - 结果记录输出
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

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme, frame::PixelSource, output::Render, rank::Recognition, url_file_path,
};

#[derive(Error, Debug)]
pub enum RecordOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("路径编码无效: {0}")]
  PathEncoding(#[from] std::string::FromUtf8Error),
}

/// 将分类结果以 JSON 写入文件
pub struct RecordOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for RecordOutput {
  const SCHEME: &'static str = "record";
}

impl FromUrl for RecordOutput {
  type Error = RecordOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(RecordOutputError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(RecordOutput {
      path: url_file_path(uri)?,
    })
  }
}

pub(crate) fn to_record<F: PixelSource + ?Sized>(frame: &F, result: &[Recognition]) -> Value {
  let recognitions: Vec<Value> = result
    .iter()
    .map(|r| {
      json!({
        "id": r.id,
        "title": r.title,
        "confidence": r.confidence,
      })
    })
    .collect();

  json!({
    "width": frame.width(),
    "height": frame.height(),
    "recognitions": recognitions,
  })
}

impl RecordOutput {
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl<F: PixelSource + ?Sized> Render<F> for RecordOutput {
  type Error = RecordOutputError;

  fn render_result(&self, frame: &F, result: &[Recognition]) -> Result<(), Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let record = to_record(frame, result);
    std::fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
    info!("记录结果到文件: {}", self.path.display());

    Ok(())
  }
}
