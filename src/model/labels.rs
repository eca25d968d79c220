// 该文件是 Shibie （识别） 项目的一部分。
// src/model/labels.rs - 标签列表
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

use std::ops::Deref;

/// 有序标签列表，第 i 个标签对应模型第 i 个输出槽位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelList {
  labels: Box<[String]>,
}

impl LabelList {
  /// 按行拆分，保留顺序和中间的空行，末尾换行不产生额外的空标签
  ///
  /// `\r\n`、`\n` 与单独的 `\r` 都视为换行。
  pub fn parse(text: &str) -> Self {
    Self {
      labels: split_lines(text).map(str::to_string).collect(),
    }
  }

  pub fn title(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
  let mut rest = text;
  std::iter::from_fn(move || {
    if rest.is_empty() {
      return None;
    }
    let Some(at) = rest.find(['\r', '\n']) else {
      return Some(std::mem::take(&mut rest));
    };
    let line = &rest[..at];
    let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
    rest = &rest[at + width..];
    Some(line)
  })
}

impl Deref for LabelList {
  type Target = [String];

  fn deref(&self) -> &Self::Target {
    &self.labels
  }
}

impl<S: Into<String>> FromIterator<S> for LabelList {
  fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
    Self {
      labels: iter.into_iter().map(Into::into).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trailing_newline_adds_no_label() {
    let labels = LabelList::parse("daisy\ndandelion\nroses\n");
    assert_eq!(&*labels, &["daisy", "dandelion", "roses"]);
  }

  #[test]
  fn keeps_interior_empty_lines_and_crlf() {
    let labels = LabelList::parse("a\r\n\r\nc");
    assert_eq!(labels.len(), 3);
    assert_eq!(labels.title(1), Some(""));
    assert_eq!(labels.title(2), Some("c"));
    assert_eq!(labels.title(3), None);
  }

  #[test]
  fn lone_carriage_return_breaks_lines() {
    let labels = LabelList::parse("a\rb\r");
    assert_eq!(&*labels, &["a", "b"]);

    let labels = LabelList::parse("a\r\rb\nc\r\nd");
    assert_eq!(&*labels, &["a", "", "b", "c", "d"]);
  }

  #[test]
  fn empty_text_has_no_labels() {
    assert!(LabelList::parse("").is_empty());
  }
}
