// 旧式复制渠道 - 把文本通过标准输入交给平台复制程序

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ChannelKind, ShareChannel, ShareError, SharePayload};

/// 通过外部复制程序（pbcopy / clip / wl-copy / xclip）写入剪贴板
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// 从配置的命令行（程序 + 参数）创建
    pub fn from_command_line(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// 按平台选择第一个可用的复制程序
    pub fn platform_default() -> Option<Self> {
        let candidates: Vec<(&str, Vec<&str>)> = if cfg!(target_os = "macos") {
            vec![("pbcopy", vec![])]
        } else if cfg!(target_os = "windows") {
            vec![("clip", vec![])]
        } else {
            vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("xsel", vec!["--clipboard", "--input"]),
            ]
        };

        candidates
            .into_iter()
            .find(|(program, _)| find_in_path(program).is_some())
            .map(|(program, args)| {
                Self::new(program, args.into_iter().map(str::to_string).collect())
            })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// 在 PATH 中查找可执行文件
fn find_in_path(program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        let exe = dir.join(format!("{}.exe", program));
        exe.is_file().then_some(exe)
    })
}

#[async_trait]
impl ShareChannel for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::LegacyCopy
    }

    fn is_available(&self) -> bool {
        find_in_path(&self.program).is_some()
    }

    async fn deliver(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ShareError::Failed(format!("无法启动 {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.full_text().as_bytes())
                .await
                .map_err(|e| ShareError::Failed(format!("写入 {} 失败: {}", self.program, e)))?;
            // 关闭 stdin，复制程序才会结束
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ShareError::Failed(format!("等待 {} 失败: {}", self.program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ShareError::Failed(format!(
                "{} 退出码 {:?}: {}",
                self.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line() {
        assert!(CommandClipboard::from_command_line(&[]).is_none());
        assert!(CommandClipboard::from_command_line(&[" ".to_string()]).is_none());

        let parts = vec!["xclip".to_string(), "-selection".to_string(), "clipboard".to_string()];
        let clipboard = CommandClipboard::from_command_line(&parts).unwrap();
        assert_eq!(clipboard.program(), "xclip");
        assert_eq!(clipboard.args, vec!["-selection", "clipboard"]);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let clipboard = CommandClipboard::new("definitely-not-a-copy-tool-7f3a", vec![]);
        assert!(!clipboard.is_available());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deliver_pipes_full_text() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clipboard.txt");

        let clipboard = CommandClipboard::new(
            "sh",
            vec!["-c".to_string(), format!("cat > '{}'", target.display())],
        );
        assert!(clipboard.is_available());

        let payload = SharePayload::promotional("https://example.com/app");
        clipboard.deliver(&payload).await.unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, payload.full_text());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_reports_failure() {
        let clipboard = CommandClipboard::new("sh", vec!["-c".to_string(), "exit 3".to_string()]);
        let result = clipboard.deliver(&SharePayload::promotional("")).await;
        assert!(matches!(result, Err(ShareError::Failed(_))));
    }
}
