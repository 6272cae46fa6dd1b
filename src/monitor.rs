use crate::registry::{Interface, Registry};

/// 单个网卡一帧的流量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub total_bytes: u64, // 收发累计字节数（计数器绝对值之和）
    pub tx_bytes: u64,    // 本周期发送字节数
    pub rx_bytes: u64,    // 本周期接收字节数
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceStats<'a> {
    pub name: &'a str,
    pub stats: TrafficStats,
}

/// 流量监控器接口
pub trait TrafficMonitor {
    /// 采样一次，按注册顺序返回每个网卡的统计
    fn sample(&mut self) -> Vec<InterfaceStats<'_>>;

    /// 名称列宽度
    fn name_width(&self) -> usize;

    /// 获取监控器名称
    fn name(&self) -> &str;
}

impl Interface {
    /// 读取失败时保留上次的值，增量记为 0
    pub fn sample(&mut self) -> TrafficStats {
        let tx_bytes = self.tx.sample().unwrap_or_else(|e| {
            tracing::warn!(interface = %self.name, error = %e, "tx counter read failed");
            0
        });
        let rx_bytes = self.rx.sample().unwrap_or_else(|e| {
            tracing::warn!(interface = %self.name, error = %e, "rx counter read failed");
            0
        });

        TrafficStats {
            total_bytes: self.tx.last().saturating_add(self.rx.last()),
            tx_bytes,
            rx_bytes,
        }
    }
}

impl TrafficMonitor for Registry {
    fn sample(&mut self) -> Vec<InterfaceStats<'_>> {
        self.interfaces_mut()
            .iter_mut()
            .map(|iface| {
                let stats = iface.sample();
                let iface: &Interface = iface;
                InterfaceStats {
                    name: &iface.name,
                    stats,
                }
            })
            .collect()
    }

    fn name_width(&self) -> usize {
        Registry::name_width(self)
    }

    fn name(&self) -> &str {
        "sysfs"
    }
}
