// 该文件是 Shibie （识别） 项目的一部分。
// tests/classify.rs - 分类流程测试
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

use shibie::{
  Classifier, ClassifierBuilder, ClassifyError,
  frame::{ArgbFrame, InputTensor},
  model::{Engine, ModelStore},
};
use thiserror::Error;

#[derive(Error, Debug)]
enum TestEngineError {
  #[error("malformed weights: {0} bytes")]
  Malformed(usize),
  #[error("engine failure")]
  Failure,
}

/// 模型字节为小端 f32 权重；每个槽位的分数为权重乘以图像平均亮度
struct BrightnessEngine {
  weights: Vec<f32>,
}

impl Engine for BrightnessEngine {
  type Error = TestEngineError;

  fn load(model: &[u8]) -> Result<Self, Self::Error> {
    if model.is_empty() || model.len() % 4 != 0 {
      return Err(TestEngineError::Malformed(model.len()));
    }
    let weights = model
      .chunks_exact(4)
      .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
      .collect();
    Ok(BrightnessEngine { weights })
  }

  fn infer(&self, input: &InputTensor) -> Result<Vec<f32>, Self::Error> {
    let values = input.as_ref();
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let brightness = (mean + 1.0) / 2.0;
    Ok(self.weights.iter().map(|w| w * brightness).collect())
  }
}

struct FailingEngine;

impl Engine for FailingEngine {
  type Error = TestEngineError;

  fn load(_model: &[u8]) -> Result<Self, Self::Error> {
    Ok(FailingEngine)
  }

  fn infer(&self, _input: &InputTensor) -> Result<Vec<f32>, Self::Error> {
    Err(TestEngineError::Failure)
  }
}

const WEIGHTS: [f32; 5] = [0.9, 0.1, 0.5, 0.99, 0.2];
const LABELS: &str = "daisy\ndandelion\nroses\nsunflowers\ntulips\n";

fn model_bytes(weights: &[f32]) -> Vec<u8> {
  weights.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn white(side: u32) -> ArgbFrame {
  ArgbFrame::new(side, side, vec![0xFFFF_FFFF; (side * side) as usize])
}

fn ids(result: &[shibie::Recognition]) -> Vec<&str> {
  result.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn classify_then_close_then_classify_again() {
  let mut classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 8).unwrap();

  let result = classifier.classify(&white(32)).unwrap();
  assert_eq!(ids(&result), ["3", "0", "2"]);
  assert_eq!(result[0].title, "sunflowers");
  assert_eq!(result[1].title, "daisy");
  assert_eq!(result[2].title, "roses");
  assert!(result.windows(2).all(|w| w[0].confidence > w[1].confidence));

  classifier.close();
  assert!(classifier.is_closed());
  assert!(matches!(
    classifier.classify(&white(32)),
    Err(ClassifyError::UseAfterClose)
  ));

  classifier.close();
  assert!(matches!(
    classifier.classify(&white(32)),
    Err(ClassifyError::UseAfterClose)
  ));
}

#[test]
fn threshold_and_max_results_are_configurable() {
  let classifier = Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 4)
    .unwrap()
    .threshold(0.95);
  let result = classifier.classify(&white(4)).unwrap();
  assert_eq!(ids(&result), ["3"]);

  let classifier = Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 4)
    .unwrap()
    .max_results(5);
  let result = classifier.classify(&white(4)).unwrap();
  assert_eq!(ids(&result), ["3", "0", "2", "4", "1"]);
}

#[test]
fn black_image_ties_resolve_by_index() {
  let classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 4).unwrap();
  let black = ArgbFrame::new(2, 2, vec![0xFF00_0000; 4]);
  let result = classifier.classify(&black).unwrap();
  assert_eq!(ids(&result), ["0", "1", "2"]);
  assert!(result.iter().all(|r| r.confidence == 0.0));
}

#[test]
fn wider_output_than_labels_yields_unknown_titles() {
  let classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), "daisy\ndandelion\n", 4)
      .unwrap();
  let result = classifier.classify(&white(4)).unwrap();
  assert_eq!(ids(&result), ["3", "0", "2"]);
  assert_eq!(result[0].title, "Unknown");
  assert_eq!(result[1].title, "daisy");
  assert_eq!(result[2].title, "Unknown");
}

#[test]
fn more_labels_than_outputs_is_index_out_of_range() {
  let classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS[..2]), LABELS, 4).unwrap();
  assert!(matches!(
    classifier.classify(&white(4)),
    Err(ClassifyError::IndexOutOfRange(_))
  ));
}

#[test]
fn empty_image_is_invalid() {
  let classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 4).unwrap();
  let empty = ArgbFrame::new(0, 0, Vec::new());
  assert!(matches!(
    classifier.classify(&empty),
    Err(ClassifyError::InvalidImage(_))
  ));
}

#[test]
fn engine_failures_surface_as_inference_errors() {
  let classifier = Classifier::<FailingEngine>::load(&[], LABELS, 4).unwrap();
  let err = classifier.classify(&white(4)).unwrap_err();
  assert!(matches!(err, ClassifyError::Inference(_)));
}

#[test]
fn malformed_model_is_a_load_error() {
  let err = Classifier::<BrightnessEngine>::load(&[1, 2, 3], LABELS, 4)
    .err()
    .unwrap();
  assert!(matches!(err, ClassifyError::ModelLoad(_)));

  let err = ModelStore::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 0)
    .err()
    .unwrap();
  assert!(matches!(
    ClassifyError::from(err),
    ClassifyError::ModelLoad(_)
  ));
}

#[test]
fn builder_loads_assets_from_files() {
  let dir = tempfile::tempdir().unwrap();
  let model = dir.path().join("optimized_graph.tflite");
  std::fs::write(&model, model_bytes(&WEIGHTS)).unwrap();
  std::fs::write(dir.path().join("optimized_graph.txt"), LABELS).unwrap();

  let url = url::Url::parse(&format!("tflite://{}?side=16&max_results=2", model.display())).unwrap();
  let classifier = <ClassifierBuilder as shibie::FromUrl>::from_url(&url)
    .unwrap()
    .build::<BrightnessEngine>()
    .unwrap();
  assert_eq!(classifier.store().input_side(), 16);
  assert_eq!(classifier.labels().len(), 5);

  let result = classifier.classify(&white(7)).unwrap();
  assert_eq!(ids(&result), ["3", "0"]);
}

#[test]
fn builder_reports_missing_assets() {
  let dir = tempfile::tempdir().unwrap();
  let err = ClassifierBuilder::new(dir.path().join("none.tflite"), dir.path().join("none.txt"))
    .build::<BrightnessEngine>()
    .err()
    .unwrap();
  assert!(matches!(err, ClassifyError::ModelLoad(_)));
}

#[cfg(feature = "record_output")]
#[test]
fn oneshot_task_records_result() {
  use shibie::{
    FromUrl,
    output::OutputWrapper,
    task::{OneShotTask, Task},
  };

  let dir = tempfile::tempdir().unwrap();
  let record = dir.path().join("result.json");
  let output =
    OutputWrapper::from_url(&url::Url::parse(&format!("record://{}", record.display())).unwrap())
      .unwrap();
  let classifier =
    Classifier::<BrightnessEngine>::load(&model_bytes(&WEIGHTS), LABELS, 8).unwrap();

  OneShotTask
    .run_task(std::iter::once(white(3)), classifier, output)
    .unwrap();

  let value: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&record).unwrap()).unwrap();
  assert_eq!(value["width"], 3);
  assert_eq!(value["recognitions"][0]["title"], "sunflowers");
  assert_eq!(value["recognitions"].as_array().map(Vec::len), Some(3));
}
