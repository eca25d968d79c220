// 该文件是 Shibie （识别） 项目的一部分。
// src/rank.rs - 置信度排序与 Top-K 选择
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

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

pub const MAX_RESULTS: usize = 3;
pub const THRESHOLD: f32 = 0.0;
pub const UNKNOWN_TITLE: &str = "Unknown";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
  #[error("索引越界: 标签索引 {index}, 分数数量 {len}")]
  IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
  pub id: String,
  pub title: String,
  pub confidence: f32,
}

impl fmt::Display for Recognition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Title = {}, Confidence = {})", self.title, self.confidence)
  }
}

/// 堆中的候选项，置信度高者优先，相同时索引小者优先
#[derive(Debug, Clone, Copy)]
struct Candidate {
  index: usize,
  confidence: f32,
}

impl Ord for Candidate {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .confidence
      .total_cmp(&other.confidence)
      .then_with(|| other.index.cmp(&self.index))
  }
}

impl PartialOrd for Candidate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Candidate {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Candidate {}

/// 从分数向量中选出置信度不低于 `threshold` 的前 `k` 个标签，按置信度降序返回
///
/// 遍历范围为标签与分数两者中较长的一方：
/// 有标签但无分数的索引视为长度不匹配错误；有分数但无标签的索引标题为 `"Unknown"`。
pub fn rank<S: AsRef<str>>(
  scores: &[f32],
  labels: &[S],
  k: usize,
  threshold: f32,
) -> Result<Vec<Recognition>, RankError> {
  let slots = labels.len().max(scores.len());
  // 小顶堆，堆顶为当前第 k 名
  let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k + 1);
  let mut accepted = 0usize;

  for index in 0..slots {
    let confidence = *scores.get(index).ok_or(RankError::IndexOutOfRange {
      index,
      len: scores.len(),
    })?;

    // NaN 不满足比较，直接跳过
    let passes = confidence >= threshold;
    if !passes {
      continue;
    }
    accepted += 1;

    if k == 0 {
      continue;
    }
    let candidate = Candidate { index, confidence };
    if heap.len() < k {
      heap.push(Reverse(candidate));
    } else if let Some(mut top) = heap.peek_mut()
      && candidate > top.0
    {
      *top = Reverse(candidate);
    }
  }

  debug!("候选数量: ({}), 返回数量: ({})", accepted, heap.len());

  Ok(
    heap
      .into_sorted_vec()
      .into_iter()
      .map(|Reverse(candidate)| Recognition {
        id: candidate.index.to_string(),
        title: labels
          .get(candidate.index)
          .map(|label| label.as_ref().to_string())
          .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        confidence: candidate.confidence,
      })
      .collect(),
  )
}
