// 该文件是 Shibie （识别） 项目的一部分。
// src/output/console.rs - 日志输出
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

use std::convert::Infallible;

use tracing::info;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::PixelSource, output::Render, rank::Recognition};

/// 以日志形式展示分类结果
pub struct ConsoleOutput;

impl FromUrlWithScheme for ConsoleOutput {
  const SCHEME: &'static str = "console";
}

impl FromUrl for ConsoleOutput {
  type Error = Infallible;

  fn from_url(_url: &Url) -> Result<Self, Self::Error> {
    Ok(ConsoleOutput)
  }
}

/// 首个结果的展示文本，`标题::::置信度`
pub fn display_line(result: &[Recognition]) -> Option<String> {
  result
    .first()
    .map(|top| format!("{}::::{}", top.title, top.confidence))
}

impl<F: PixelSource + ?Sized> Render<F> for ConsoleOutput {
  type Error = Infallible;

  fn render_result(&self, frame: &F, result: &[Recognition]) -> Result<(), Self::Error> {
    info!("图像尺寸: {}x{}", frame.width(), frame.height());
    match display_line(result) {
      Some(line) => info!("{}", line),
      None => info!("没有识别结果"),
    }
    for (rank, recognition) in result.iter().enumerate() {
      info!("  #{} [{}] {}", rank + 1, recognition.id, recognition);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_line_uses_top_result() {
    let result = vec![
      Recognition {
        id: "3".to_string(),
        title: "tulips".to_string(),
        confidence: 0.75,
      },
      Recognition {
        id: "0".to_string(),
        title: "daisy".to_string(),
        confidence: 0.25,
      },
    ];
    assert_eq!(display_line(&result).as_deref(), Some("tulips::::0.75"));
    assert_eq!(display_line(&[]), None);
  }
}
