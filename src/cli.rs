use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{Config, NET_DIR};
use crate::registry::NameFilter;

/// EINVAL
pub const USAGE_EXIT: i32 = 22;

// ==================== 命令行参数定义 ====================
#[derive(Parser, Debug)]
#[command(
    name = "netsp",
    version,
    about = "netsp - A simple bandwidth monitor",
    after_help = "Example:\n  netsp w e\n  netsp wlan eth\n  netsp --all"
)]
pub struct Cli {
    /// 网卡名前缀，例如 wlan、eth
    #[arg(value_name = "NET_PREFIX", conflicts_with_all = ["all", "show"])]
    pub prefixes: Vec<String>,

    /// 监控所有网卡
    #[arg(long, conflicts_with = "show")]
    pub all: bool,

    /// 列出所有网卡名后退出
    #[arg(long)]
    pub show: bool,

    /// 网卡列表目录
    #[arg(long, value_name = "DIR", default_value = NET_DIR)]
    pub net_dir: PathBuf,

    /// 渲染帧数（0 表示永久运行）
    #[arg(short = 'n', long, default_value_t = 0)]
    pub frames: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// 只列出网卡
    Show,
    /// 监控匹配的网卡
    Monitor(NameFilter),
}

/// 解析结果：要么是可执行的命令，要么是需要打印的帮助/错误及退出码
#[derive(Debug)]
pub enum Parsed {
    Run(Cli, Mode),
    Exit { message: String, code: i32 },
}

impl Cli {
    /// 无参数或无法识别的参数：打印用法并以 EINVAL 退出
    pub fn parse_args<I, T>(args: I) -> Parsed
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => {
                let code = match e.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => USAGE_EXIT,
                };
                return Parsed::Exit {
                    message: e.render().to_string(),
                    code,
                };
            }
        };

        match cli.mode() {
            Some(mode) => Parsed::Run(cli, mode),
            None => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                Parsed::Exit {
                    message: cmd.render_help().to_string(),
                    code: USAGE_EXIT,
                }
            }
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        if self.show {
            Some(Mode::Show)
        } else if self.all {
            Some(Mode::Monitor(NameFilter::All))
        } else if !self.prefixes.is_empty() {
            Some(Mode::Monitor(NameFilter::Prefixes(self.prefixes.clone())))
        } else {
            None
        }
    }

    pub fn config(&self) -> Config {
        Config {
            net_dir: self.net_dir.clone(),
            frames: (self.frames > 0).then_some(self.frames),
            ..Config::default()
        }
    }
}
