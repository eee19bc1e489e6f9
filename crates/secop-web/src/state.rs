//! 应用共享状态

use std::sync::Arc;

use secop_database::SubmissionRepository;
use secop_funnel::TempSubmissionStore;
use secop_integration::FanoutNotifier;
use secop_submission::{CaseStateMachine, SubmissionOrchestrator};

/// 注入所有处理器的共享状态
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator<SubmissionRepository, FanoutNotifier>>,
    pub store: Arc<SubmissionRepository>,
    pub temp_store: Arc<TempSubmissionStore>,
    pub state_machine: Arc<CaseStateMachine>,
}

impl AppState {
    pub fn new(
        store: Arc<SubmissionRepository>,
        notifier: Arc<FanoutNotifier>,
        temp_store: Arc<TempSubmissionStore>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(SubmissionOrchestrator::new(Arc::clone(&store), notifier)),
            store,
            temp_store,
            state_machine: Arc::new(CaseStateMachine::new()),
        }
    }
}
