//! 单槽信箱
//!
//! 接收任务写入、主循环取出。后写覆盖先写：两次对方走棋之间最多只会有一条
//! 待处理的消息，协议依赖这一点。

use std::sync::{Mutex, PoisonError};

/// 保存最近一次收到的对方走法
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Mutex<Option<usize>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入走法，返回被覆盖的旧值
    pub fn put(&self, col: usize) -> Option<usize> {
        // 槽里只有一个 Copy 值，不会出现写了一半的状态，中毒后照常使用
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(col)
    }

    /// 取出并清空
    pub fn take(&self) -> Option<usize> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}
