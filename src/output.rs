// 该文件是 Shibie （识别） 项目的一部分。
// src/output.rs - 输出定义
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

use crate::frame::PixelSource;
use crate::rank::Recognition;
use crate::{FromUrl, FromUrlWithScheme};
use thiserror::Error;
use url::Url;

pub trait Render<Frame: ?Sized>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &[Recognition]) -> Result<(), Self::Error>;
}

mod console;
pub use self::console::{ConsoleOutput, display_line};

#[cfg(feature = "record_output")]
mod record;
#[cfg(feature = "record_output")]
pub use self::record::{RecordOutput, RecordOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "record_output")]
  #[error("记录输出错误: {0}")]
  RecordOutputError(#[from] RecordOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  Console(ConsoleOutput),
  #[cfg(feature = "record_output")]
  Record(RecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      ConsoleOutput::SCHEME => Ok(OutputWrapper::Console(ConsoleOutput)),
      #[cfg(feature = "record_output")]
      RecordOutput::SCHEME => {
        let output = RecordOutput::from_url(url)?;
        Ok(OutputWrapper::Record(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl<F: PixelSource + ?Sized> Render<F> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &F, result: &[Recognition]) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::Console(output) => match output.render_result(frame, result) {
        Ok(()) => Ok(()),
        Err(never) => match never {},
      },
      #[cfg(feature = "record_output")]
      OutputWrapper::Record(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}
