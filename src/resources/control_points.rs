//! 控制点文件加载
//!
//! 文件格式为纯文本，每行一个点，三个以空白分隔的数字：
//!
//! ```text
//! # x    y    z
//! 0.0  0.0  0.0
//! 4.0  1.0 -2.0
//! ```
//!
//! 空行和 `#` 之后的内容被忽略，格式错误的行跳过并记录警告。

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::Vec3;

use crate::core::error::{AssetError, AssetResult};

/// 解析控制点文本
pub fn parse_control_points(content: &str) -> Vec<Vec3> {
    let mut points = Vec::new();

    for (line_number, raw) in content.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        match parse_point(line) {
            Some(point) => points.push(point),
            None => {
                tracing::warn!(
                    target: "assets",
                    "Skipping malformed control point on line {}: {:?}",
                    line_number + 1,
                    raw
                );
            }
        }
    }

    points
}

fn parse_point(line: &str) -> Option<Vec3> {
    let mut fields = line.split_whitespace().map(str::parse::<f32>);
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let z = fields.next()?.ok()?;
    if fields.next().is_some() {
        return None;
    }

    let point = Vec3::new(x, y, z);
    point.is_finite().then_some(point)
}

/// 从文件加载控制点
pub fn load_control_points<P: AsRef<Path>>(path: P) -> AssetResult<Vec<Vec3>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AssetError::NotFound {
            path: path.display().to_string(),
        },
        _ => AssetError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
    })?;

    let points = parse_control_points(&content);
    tracing::debug!(
        target: "assets",
        "Loaded {} control points from {}",
        points.len(),
        path.display()
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_points() {
        let points = parse_control_points("0 0 0\n1.5 -2 3e1\n");
        assert_eq!(
            points,
            vec![Vec3::ZERO, Vec3::new(1.5, -2.0, 30.0)]
        );
    }

    #[test]
    fn test_skip_comments_and_blank_lines() {
        let content = "# header\n\n  1 2 3  # trailing\n\t\n4 5 6\n";
        let points = parse_control_points(content);
        assert_eq!(points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn test_skip_malformed_lines() {
        let content = "1 2\n1 2 3 4\nx y z\n7 8 9\nnan 0 0\n";
        let points = parse_control_points(content);
        assert_eq!(points, vec![Vec3::new(7.0, 8.0, 9.0)]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0 0").unwrap();
        writeln!(file, "1 0 0").unwrap();
        writeln!(file, "1 1 0").unwrap();
        writeln!(file, "0 1 0").unwrap();
        file.flush().unwrap();

        let points = load_control_points(file.path()).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_control_points(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(AssetError::NotFound { .. })));
    }

    #[test]
    fn test_unreadable_path() {
        // 目录不能按文本读取
        let dir = tempfile::tempdir().unwrap();
        let result = load_control_points(dir.path());
        assert!(matches!(result, Err(AssetError::LoadFailed { .. })));
    }
}
