//! 病例状态机
//!
//! 管理病例从提交到交付的完整生命周期状态转换。
//! 状态只能经由显式的转换事件推进，终态之后不再可变。

use secop_core::{CaseStatus, Result, SecopError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 病例状态转换事件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseEvent {
    ProcessingStarted,
    AiAnalysisStarted,
    ExpertAssigned,
    ReviewStarted,
    PeerReviewStarted,
    ReviewCompleted,
    Delivered,
}

/// 病例状态机
#[derive(Debug)]
pub struct CaseStateMachine {
    transitions: HashMap<(CaseStatus, CaseEvent), CaseStatus>,
}

impl CaseStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        // 定义状态转换规则
        transitions.insert(
            (CaseStatus::Submitted, CaseEvent::ProcessingStarted),
            CaseStatus::Processing,
        );
        transitions.insert(
            (CaseStatus::Processing, CaseEvent::AiAnalysisStarted),
            CaseStatus::AiAnalysis,
        );
        transitions.insert(
            (CaseStatus::AiAnalysis, CaseEvent::ExpertAssigned),
            CaseStatus::Assigned,
        );
        transitions.insert(
            (CaseStatus::Assigned, CaseEvent::ReviewStarted),
            CaseStatus::UnderReview,
        );
        transitions.insert(
            (CaseStatus::UnderReview, CaseEvent::PeerReviewStarted),
            CaseStatus::PeerReview,
        );
        transitions.insert(
            (CaseStatus::PeerReview, CaseEvent::ReviewCompleted),
            CaseStatus::Completed,
        );
        transitions.insert(
            (CaseStatus::Completed, CaseEvent::Delivered),
            CaseStatus::Delivered,
        );

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: &CaseStatus, event: &CaseEvent) -> bool {
        self.transitions.contains_key(&(from.clone(), event.clone()))
    }

    /// 执行状态转换
    pub fn transition(&self, from: &CaseStatus, event: &CaseEvent) -> Result<CaseStatus> {
        match self.transitions.get(&(from.clone(), event.clone())) {
            Some(to) => Ok(to.clone()),
            None => Err(SecopError::InvalidStateTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            }),
        }
    }

    /// 获取所有可能的状态
    pub fn get_all_states() -> Vec<CaseStatus> {
        vec![
            CaseStatus::Submitted,
            CaseStatus::Processing,
            CaseStatus::AiAnalysis,
            CaseStatus::Assigned,
            CaseStatus::UnderReview,
            CaseStatus::PeerReview,
            CaseStatus::Completed,
            CaseStatus::Delivered,
        ]
    }

    /// 获取状态的所有可能事件
    pub fn get_possible_events(&self, current_state: &CaseStatus) -> Vec<CaseEvent> {
        self.transitions
            .keys()
            .filter(|(state, _)| state == current_state)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl Default for CaseStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let sm = CaseStateMachine::new();

        // 测试有效转换
        assert!(sm.can_transition(&CaseStatus::Submitted, &CaseEvent::ProcessingStarted));
        assert!(sm.can_transition(&CaseStatus::Processing, &CaseEvent::AiAnalysisStarted));
        assert!(sm.can_transition(&CaseStatus::Completed, &CaseEvent::Delivered));
    }

    #[test]
    fn test_invalid_transitions() {
        let sm = CaseStateMachine::new();

        // 测试无效转换
        assert!(!sm.can_transition(&CaseStatus::Delivered, &CaseEvent::ProcessingStarted));
        assert!(!sm.can_transition(&CaseStatus::Submitted, &CaseEvent::Delivered));
        assert!(!sm.can_transition(&CaseStatus::AiAnalysis, &CaseEvent::ReviewStarted));
    }

    #[test]
    fn test_full_lifecycle_chain() {
        let sm = CaseStateMachine::new();
        let events = [
            CaseEvent::ProcessingStarted,
            CaseEvent::AiAnalysisStarted,
            CaseEvent::ExpertAssigned,
            CaseEvent::ReviewStarted,
            CaseEvent::PeerReviewStarted,
            CaseEvent::ReviewCompleted,
            CaseEvent::Delivered,
        ];

        let mut status = CaseStatus::Submitted;
        for event in events {
            status = sm.transition(&status, &event).unwrap();
        }
        assert_eq!(status, CaseStatus::Delivered);
    }

    #[test]
    fn test_terminal_state_has_no_events() {
        let sm = CaseStateMachine::new();
        assert!(sm.get_possible_events(&CaseStatus::Delivered).is_empty());

        let result = sm.transition(&CaseStatus::Delivered, &CaseEvent::ReviewCompleted);
        assert!(matches!(
            result,
            Err(SecopError::InvalidStateTransition { .. })
        ));
    }
}
