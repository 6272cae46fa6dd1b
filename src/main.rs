use std::process::ExitCode;

use netsp::cli::{Cli, Mode, Parsed};
use netsp::render::RunControl;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(
        &self,
        w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

fn init_logging() {
    // 标准输出用于显示，日志写到标准错误
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

// ==================== 主函数 ====================
fn main() -> ExitCode {
    let (cli, mode) = match Cli::parse_args(std::env::args_os()) {
        Parsed::Run(cli, mode) => (cli, mode),
        Parsed::Exit { message, code } => {
            if code == 0 {
                print!("{}", message);
            } else {
                eprint!("{}", message);
            }
            return exit_code(code);
        }
    };

    init_logging();

    let config = cli.config();
    if let Err(e) = config.validate() {
        eprintln!("netsp: config: {:#}", e);
        return exit_code(netsp::cli::USAGE_EXIT);
    }

    let result = match mode {
        Mode::Show => netsp::show(&config, netsp::stdout()),
        Mode::Monitor(filter) => {
            let control = RunControl::from_limit(config.frames);
            let stop = control.stop_flag();
            if let Err(e) = ctrlc::set_handler(move || {
                stop.store(true, std::sync::atomic::Ordering::SeqCst);
            }) {
                tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            }
            netsp::run(&config, &filter, &control, netsp::stdout()).map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("netsp: {}", e);
            exit_code(e.code())
        }
    }
}
