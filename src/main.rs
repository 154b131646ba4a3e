use anyhow::Result;
use auto_folder_organize::component::FolderOrganizer;
use auto_folder_organize::config::Config;
use auto_folder_organize::init;
use auto_folder_organize::signal::setup_shutdown_signal;
use clap::Parser;
use console::style;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "auto_folder_organize",
    version,
    about = "依副檔名將資料夾中的檔案整理到分類資料夾"
)]
struct Cli {
    /// 要整理的資料夾路徑
    directory: PathBuf,
}

fn main() -> ExitCode {
    // 參數錯誤時 clap 會印出用法並以非零狀態結束
    let cli = Cli::parse();
    init::init();

    match run(&cli) {
        Ok(()) => {
            info!("Program exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Program error: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let shutdown_signal = setup_shutdown_signal()?;
    let config = Config::new()?;

    let organizer = FolderOrganizer::new(config, shutdown_signal);
    organizer.run(&cli.directory)?;

    Ok(())
}
