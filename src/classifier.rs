// 该文件是 Shibie （识别） 项目的一部分。
// src/classifier.rs - 图像分类服务
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

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  encode::{EncodeError, encode},
  frame::PixelSource,
  model::{Engine, LabelList, ModelAssets, ModelStore, ModelStoreError},
  rank::{MAX_RESULTS, RankError, Recognition, THRESHOLD, rank},
  url_file_path,
};

pub const DEFAULT_INPUT_SIDE: u32 = 224;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClassifyError {
  #[error("{0}")]
  ModelLoad(#[source] ModelStoreError),
  #[error("模型已关闭")]
  UseAfterClose,
  #[error("图像无效: {0}")]
  InvalidImage(#[from] EncodeError),
  #[error("标签与分数长度不匹配: {0}")]
  IndexOutOfRange(#[from] RankError),
  #[error("推理错误: {0}")]
  Inference(#[source] BoxError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("参数无效: {0}")]
  InvalidParameter(String),
}

impl From<ModelStoreError> for ClassifyError {
  fn from(err: ModelStoreError) -> Self {
    match err {
      ModelStoreError::UseAfterClose => ClassifyError::UseAfterClose,
      err => ClassifyError::ModelLoad(err),
    }
  }
}

/// 组合编码、推理与排序的分类服务
pub struct Classifier<E> {
  store: ModelStore<E>,
  max_results: usize,
  threshold: f32,
}

impl<E: Engine> Classifier<E> {
  pub fn new(store: ModelStore<E>) -> Self {
    Classifier {
      store,
      max_results: MAX_RESULTS,
      threshold: THRESHOLD,
    }
  }

  pub fn load(model: &[u8], labels: &str, input_side: u32) -> Result<Self, ClassifyError> {
    Ok(Self::new(ModelStore::load(model, labels, input_side)?))
  }

  pub fn max_results(mut self, max_results: usize) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn store(&self) -> &ModelStore<E> {
    &self.store
  }

  pub fn labels(&self) -> &LabelList {
    self.store.labels()
  }

  /// 对一张图像分类，返回置信度降序的结果
  pub fn classify<I: PixelSource + ?Sized>(
    &self,
    image: &I,
  ) -> Result<Vec<Recognition>, ClassifyError> {
    let engine = self.store.engine()?;
    let tensor = encode(image, self.store.input_side())?;

    let scores = engine.infer(&tensor).map_err(|e| {
      error!("推理失败: {}", e);
      ClassifyError::Inference(e.into())
    })?;

    let labels = self.store.labels();
    debug!("列表尺寸: ({}, {})", scores.len(), labels.len());
    if scores.len() != labels.len() {
      warn!(
        "输出宽度 {} 与标签数量 {} 不一致",
        scores.len(),
        labels.len()
      );
    }

    Ok(rank(&scores, &labels[..], self.max_results, self.threshold)?)
  }

  pub fn close(&mut self) {
    self.store.close();
  }

  pub fn is_closed(&self) -> bool {
    self.store.is_closed()
  }
}

/// 分类器配置
///
/// URL 形式: `tflite:///path/model.tflite?labels=/path/labels.txt&side=224&max_results=3&threshold=0.0`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierBuilder {
  model_path: PathBuf,
  label_path: PathBuf,
  input_side: u32,
  max_results: usize,
  threshold: f32,
}

pub const CLASSIFIER_SCHEME: &str = "tflite";

impl FromUrlWithScheme for ClassifierBuilder {
  const SCHEME: &'static str = CLASSIFIER_SCHEME;
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ClassifyError> {
  value
    .parse()
    .map_err(|_| ClassifyError::InvalidParameter(format!("{} = {}", key, value)))
}

impl FromUrl for ClassifierBuilder {
  type Error = ClassifyError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ClassifyError::SchemeMismatch(format!(
        "模型路径必须使用 {} 方案, 实际为 {}",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let model_path = url_file_path(url)
      .map_err(|e| ClassifyError::InvalidParameter(format!("模型路径编码无效: {}", e)))?;
    let mut builder = ClassifierBuilder {
      label_path: model_path.with_extension("txt"),
      model_path,
      input_side: DEFAULT_INPUT_SIDE,
      max_results: MAX_RESULTS,
      threshold: THRESHOLD,
    };

    for (key, value) in url.query_pairs() {
      match key.as_ref() {
        "labels" => builder.label_path = PathBuf::from(value.as_ref()),
        "side" => builder.input_side = parse_param(&key, &value)?,
        "max_results" => builder.max_results = parse_param(&key, &value)?,
        "threshold" => builder.threshold = parse_param(&key, &value)?,
        _ => warn!("忽略未知参数: {}={}", key, value),
      }
    }

    if builder.input_side == 0 {
      return Err(ClassifyError::InvalidParameter("side = 0".to_string()));
    }

    Ok(builder)
  }
}

impl ClassifierBuilder {
  pub fn new(model_path: impl Into<PathBuf>, label_path: impl Into<PathBuf>) -> Self {
    ClassifierBuilder {
      model_path: model_path.into(),
      label_path: label_path.into(),
      input_side: DEFAULT_INPUT_SIDE,
      max_results: MAX_RESULTS,
      threshold: THRESHOLD,
    }
  }

  pub fn input_side(mut self, input_side: u32) -> Self {
    self.input_side = input_side;
    self
  }

  pub fn max_results(mut self, max_results: usize) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn build<E: Engine>(&self) -> Result<Classifier<E>, ClassifyError> {
    let assets = ModelAssets::open(&self.model_path, &self.label_path)?;
    let store = ModelStore::open(&assets, self.input_side)?;
    Ok(
      Classifier::new(store)
        .max_results(self.max_results)
        .threshold(self.threshold),
    )
  }
}
