// 该文件是 Shibie （识别） 项目的一部分。
// src/task.rs - 分类任务
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

use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::{classifier::Classifier, frame::PixelSource, model::Engine, output::Render};

/// 从输入取图、分类、渲染，结束后关闭分类器
pub trait Task<I, E, O>: Sized {
  type Error;
  fn run_task(self, input: I, classifier: Classifier<E>, output: O) -> Result<(), Self::Error>;
}

pub struct OneShotTask;

impl<F, RE, I, E, O> Task<I, E, O> for OneShotTask
where
  F: PixelSource,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  E: Engine,
  O: Render<F, Error = RE>,
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut classifier: Classifier<E>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功，开始分类...");
    let now = Instant::now();
    let result = classifier.classify(&frame)?;
    let elapsed = now.elapsed();
    info!("分类完成，耗时: {:.2?}", elapsed);
    output.render_result(&frame, &result)?;
    classifier.close();

    Ok(())
  }
}

/// 重复分类同一张图像，统计耗时
#[derive(Debug)]
pub struct RepeatShotTask {
  repeat_times: usize,
  warmup: usize,
}

impl Default for RepeatShotTask {
  fn default() -> Self {
    RepeatShotTask {
      repeat_times: 100,
      warmup: 2,
    }
  }
}

impl RepeatShotTask {
  pub fn with_repeat_times(mut self, repeat_times: usize) -> Self {
    self.repeat_times = repeat_times;
    self
  }

  pub fn with_warmup(mut self, warmup: usize) -> Self {
    self.warmup = warmup;
    self
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
  pub min: Duration,
  pub max: Duration,
  pub mean: Duration,
}

/// 跳过前 `warmup` 次后的耗时统计，样本不足时返回 `None`
pub fn summarize(times: &[Duration], warmup: usize) -> Option<Timing> {
  let samples = times.get(warmup..).filter(|s| !s.is_empty())?;
  let min = *samples.iter().min()?;
  let max = *samples.iter().max()?;
  let mean = samples.iter().sum::<Duration>() / samples.len() as u32;
  Some(Timing { min, max, mean })
}

impl<F, RE, I, E, O> Task<I, E, O> for RepeatShotTask
where
  F: PixelSource,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  E: Engine,
  O: Render<F, Error = RE>,
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut classifier: Classifier<E>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功，开始分类...");
    let mut times = Vec::with_capacity(self.repeat_times);
    let mut last = Vec::new();
    for i in 0..self.repeat_times {
      let now = Instant::now();
      last = classifier.classify(&frame)?;
      let elapsed = now.elapsed();
      info!("({})分类完成，耗时: {:.2?}", i, elapsed);
      times.push(elapsed);
    }
    output.render_result(&frame, &last)?;
    classifier.close();

    match summarize(&times, self.warmup) {
      Some(timing) => warn!(
        "分类耗时 最小: {:.2?}, 最大: {:.2?}, 平均: {:.2?}",
        timing.min, timing.max, timing.mean
      ),
      None => warn!("样本不足，无法统计耗时"),
    }

    Ok(())
  }
}
