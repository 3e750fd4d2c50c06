//! Engine configuration.
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | POS_STOCK_POLICY | clamp | 库存扣减策略: clamp \| reject |
//! | POS_HISTORY_CAP | 100 | 每个库存项的流水环形缓冲上限 |
//! | POS_AUDIT_CAP | 200 | 审计日志条数上限 |
//! | POS_CHANNEL_CAPACITY | 1024 | 广播通道容量 |

/// What happens when a deduction would take stock below zero.
///
/// The floor UI warns on low stock but does not block orders, so `Clamp`
/// is the default; `Reject` fails the whole command before any state
/// mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    #[default]
    Clamp,
    Reject,
}

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub stock_policy: StockPolicy,
    /// Per-item movement history ring size (kept within 30-200)
    pub history_cap: usize,
    /// Audit feed length
    pub audit_cap: usize,
    /// Capacity of the event / sync broadcast channels
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stock_policy: StockPolicy::Clamp,
            history_cap: 100,
            audit_cap: 200,
            channel_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            stock_policy: match std::env::var("POS_STOCK_POLICY").as_deref() {
                Ok("reject") => StockPolicy::Reject,
                Ok("clamp") => StockPolicy::Clamp,
                _ => defaults.stock_policy,
            },
            history_cap: std::env::var("POS_HISTORY_CAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(|v: usize| v.clamp(30, 200))
                .unwrap_or(defaults.history_cap),
            audit_cap: std::env::var("POS_AUDIT_CAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.audit_cap),
            channel_capacity: std::env::var("POS_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.channel_capacity),
        }
    }
}
