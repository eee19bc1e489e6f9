//! 提交客户端
//!
//! 驱动单次HTTP提交尝试：取消、进度模拟与状态跟踪。
//! 并发规则：每个客户端实例同时最多一笔在途提交，新提交
//! 先取消上一笔。用户主动取消转入 `Cancelled`，不按错误处理。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secop_submission::SubmissionRequest;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Success,
    Failed,
    Cancelled,
}

/// 提交成功回执
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub case_id: Uuid,
    pub case_number: String,
}

/// 单次尝试的状态快照
#[derive(Debug, Clone)]
pub struct AttemptState {
    pub phase: SubmissionPhase,
    /// 0-100：在途时向95爬升，仅在确认成功时跳到100
    pub progress: u8,
    pub receipt: Option<SubmissionReceipt>,
    pub error: Option<String>,
}

/// 提交传输接口
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> anyhow::Result<SubmissionReceipt>;
}

/// HTTP传输实现
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn submit(&self, request: &SubmissionRequest) -> anyhow::Result<SubmissionReceipt> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Submission rejected with status {}", response.status());
        }

        Ok(response.json::<SubmissionReceipt>().await?)
    }
}

/// 单次提交尝试的句柄
#[derive(Clone)]
pub struct AttemptHandle {
    state: Arc<RwLock<AttemptState>>,
    token: CancellationToken,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AttemptHandle {
    /// 当前状态快照
    pub async fn snapshot(&self) -> AttemptState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SubmissionPhase {
        self.state.read().await.phase
    }

    pub async fn progress(&self) -> u8 {
        self.state.read().await.progress
    }

    /// 取消该次尝试（在途HTTP请求随之中止）
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 等待尝试结束
    pub async fn wait(&self) {
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

/// 提交客户端
pub struct SubmissionClient<T> {
    transport: Arc<T>,
    current: Mutex<Option<AttemptHandle>>,
}

impl<T: SubmitTransport + 'static> SubmissionClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            current: Mutex::new(None),
        }
    }

    /// 发起一次提交尝试
    ///
    /// 已有在途提交时先取消它——每个实例最多一笔在途请求。
    pub async fn submit(&self, request: SubmissionRequest) -> AttemptHandle {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.as_ref() {
            debug!("Cancelling in-flight submission before starting a new one");
            previous.cancel();
        }

        let state = Arc::new(RwLock::new(AttemptState {
            phase: SubmissionPhase::Submitting,
            progress: 0,
            receipt: None,
            error: None,
        }));
        let token = CancellationToken::new();

        let transport = Arc::clone(&self.transport);
        let task_state = Arc::clone(&state);
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(100));
            ticker.tick().await; // 首个tick立即完成

            let submit_fut = transport.submit(&request);
            tokio::pin!(submit_fut);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        // select!丢弃请求future，底层连接随之中止
                        let mut state = task_state.write().await;
                        state.phase = SubmissionPhase::Cancelled;
                        return;
                    }
                    _ = ticker.tick() => {
                        let mut state = task_state.write().await;
                        if state.progress < 95 {
                            state.progress += 5;
                        }
                    }
                    result = &mut submit_fut => {
                        let mut state = task_state.write().await;
                        match result {
                            Ok(receipt) => {
                                state.phase = SubmissionPhase::Success;
                                state.progress = 100;
                                state.receipt = Some(receipt);
                            }
                            Err(e) => {
                                state.phase = SubmissionPhase::Failed;
                                state.error = Some(e.to_string());
                            }
                        }
                        return;
                    }
                }
            }
        });

        let handle = AttemptHandle {
            state,
            token,
            task: Arc::new(Mutex::new(Some(task))),
        };
        *current = Some(handle.clone());
        handle
    }

    /// 取消当前在途提交（没有在途提交时无操作）
    pub async fn cancel(&self) {
        if let Some(handle) = self.current.lock().await.as_ref() {
            handle.cancel();
        }
    }

    /// 最近一次尝试的状态
    pub async fn state(&self) -> Option<AttemptState> {
        match self.current.lock().await.as_ref() {
            Some(handle) => Some(handle.snapshot().await),
            None => None,
        }
    }
}
