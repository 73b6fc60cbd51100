// LLM Manager Actor - 使用Actor模式管理LLM状态
//
// 用消息传递替代锁机制，消除Arc<Mutex<LLMManager>>的锁竞争

use crate::llm::{LLMConfig, LLMManager};
use crate::scan::{AthkarExtraction, ScanError, ScanImage};
use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

/// LLM管理器命令
pub enum LLMCommand {
    /// 配置LLM
    Configure {
        config: LLMConfig,
        reply: oneshot::Sender<Result<()>>,
    },

    /// 识别图片
    Extract {
        image: ScanImage,
        reply: oneshot::Sender<Result<AthkarExtraction, ScanError>>,
    },

    /// 获取配置
    GetConfig { reply: oneshot::Sender<LLMConfig> },

    /// 切换 LLM provider
    SwitchProvider {
        provider: String,
        reply: oneshot::Sender<Result<()>>,
    },

    /// 健康检查（Ping）
    HealthCheck { reply: oneshot::Sender<()> },
}

/// LLM Manager Actor（无需外层Mutex）
pub struct LLMManagerActor {
    receiver: mpsc::Receiver<LLMCommand>,
    manager: LLMManager, // 直接持有，无需锁
}

impl LLMManagerActor {
    /// 创建新的Actor
    pub fn new(manager: LLMManager) -> (Self, LLMHandle) {
        let (sender, receiver) = mpsc::channel(20);
        let actor = Self { receiver, manager };
        let handle = LLMHandle { sender };
        (actor, handle)
    }

    /// 运行Actor（在单独的任务中运行）
    pub async fn run(mut self) {
        tracing::info!("LLM Manager Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LLMCommand::Configure { config, reply } => {
                    let result = self.manager.configure(config);
                    let _ = reply.send(result);
                }

                LLMCommand::Extract { image, reply } => {
                    let result = self.manager.extract(&image).await;
                    let _ = reply.send(result);
                }

                LLMCommand::GetConfig { reply } => {
                    let _ = reply.send(self.manager.get_config());
                }

                LLMCommand::SwitchProvider { provider, reply } => {
                    let result = self.manager.switch_provider(&provider);
                    let _ = reply.send(result);
                }

                LLMCommand::HealthCheck { reply } => {
                    // 立即响应，表明Actor正常运行
                    let _ = reply.send(());
                }
            }
        }

        tracing::info!("LLM Manager Actor 已停止");
    }
}

/// LLM Handle（用于与Actor通信，可克隆）
#[derive(Clone)]
pub struct LLMHandle {
    sender: mpsc::Sender<LLMCommand>,
}

impl LLMHandle {
    /// 配置LLM
    pub async fn configure(&self, config: LLMConfig) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::Configure { config, reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 识别图片（没有超时，调用方一直等待结果）
    pub async fn extract(&self, image: ScanImage) -> Result<AthkarExtraction, ScanError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::Extract { image, reply })
            .await
            .map_err(|_| ScanError::Provider("Actor通道已关闭".to_string()))?;
        rx.await
            .map_err(|_| ScanError::Provider("Actor已停止".to_string()))?
    }

    /// 获取配置
    pub async fn get_config(&self) -> Result<LLMConfig> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::GetConfig { reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        Ok(rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?)
    }

    /// 切换 LLM provider
    pub async fn switch_provider(&self, provider: String) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::SwitchProvider { provider, reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 健康检查 - 检测Actor是否响应
    ///
    /// # 返回
    /// - `true`: Actor正常响应
    /// - `false`: Actor无响应或已停止
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();

        // 尝试发送健康检查命令
        if self
            .sender
            .send(LLMCommand::HealthCheck { reply })
            .await
            .is_err()
        {
            tracing::warn!("LLM Manager Actor 健康检查失败: 通道已关闭");
            return false;
        }

        // 等待响应，超时5秒
        match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
            Ok(Ok(())) => {
                tracing::debug!("LLM Manager Actor 健康检查成功");
                true
            }
            Ok(Err(_)) => {
                tracing::warn!("LLM Manager Actor 健康检查失败: Actor已停止");
                false
            }
            Err(_) => {
                tracing::warn!("LLM Manager Actor 健康检查失败: 响应超时");
                false
            }
        }
    }
}
