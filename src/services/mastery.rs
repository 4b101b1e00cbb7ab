//! 掌握度追踪
//!
//! 纯状态转移：给定已有进度和本次是否答对，算出新的连对次数、
//! 尝试次数和是否掌握。读写存储由 `store::ProgressStore` 负责。

use crate::models::{MasteryUpdate, ProgressSnapshot};

/// 连续答对多少次视为掌握
pub const MASTERY_THRESHOLD: u32 = 3;

/// 掌握度追踪器
pub struct MasteryTracker;

impl MasteryTracker {
    /// 根据已有进度计算一次作答后的状态
    ///
    /// - 没有记录：attempts = 1，答对 streak = 1，否则 0
    /// - 已有记录：答对 streak + 1，答错归零；attempts + 1
    pub fn advance(prior: Option<ProgressSnapshot>, is_correct: bool) -> MasteryUpdate {
        let (streak, attempts) = match prior {
            Some(p) => (
                if is_correct { p.streak + 1 } else { 0 },
                p.attempts + 1,
            ),
            None => (u32::from(is_correct), 1),
        };

        MasteryUpdate {
            streak,
            attempts,
            mastery_achieved: streak >= MASTERY_THRESHOLD,
        }
    }

    /// 根据作答历史重放出最终状态
    pub fn replay(history: &[bool]) -> Option<MasteryUpdate> {
        history.iter().fold(None, |state: Option<MasteryUpdate>, &is_correct| {
            Some(Self::advance(state.map(Into::into), is_correct))
        })
    }
}

/// 本次作答的练习进度分数（0-100）
///
/// 答对为 100；答错时从 30 开始，每用一次提示减 10，最低为 0
pub fn mastery_progress(correct: bool, hints_given: u32) -> u8 {
    if correct {
        100
    } else {
        30u32.saturating_sub(hints_given.saturating_mul(10)) as u8
    }
}
