use anyhow::Result;
use clap::Parser;
use console::style;
use log::{error, info};
use std::process::ExitCode;
use video_contact_sheet::SheetError;
use video_contact_sheet::cli::Cli;
use video_contact_sheet::component::ContactSheetGenerator;
use video_contact_sheet::config::{SheetSettings, write_settings};
use video_contact_sheet::init;
use video_contact_sheet::signal::{INTERRUPT_EXIT_CODE, setup_shutdown_signal};
use video_contact_sheet::tools::{has_accelerated_decoder, validate_path_exists};

/// 找不到硬體解碼器時的結束狀態
const NO_ACCELERATED_DECODER_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    init::init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("Program error: {e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = SheetSettings::load(cli.config.as_deref())?;
    if let Some(count) = cli.count {
        settings.frame_count = count;
        settings.validate()?;
    }

    if cli.dump_config {
        write_settings(&settings, std::io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    // 硬體能力只在啟動時檢查一次，結果交給生成器
    let accelerated_decoder = has_accelerated_decoder();
    if !accelerated_decoder {
        return Ok(report_fatal(&SheetError::NoAcceleratedDecoder));
    }

    let input_path = cli.resolve_input_path()?;
    validate_path_exists(&input_path)?;

    let shutdown_signal = setup_shutdown_signal()?;
    let generator = ContactSheetGenerator::new(settings, accelerated_decoder, shutdown_signal);

    match generator.run(&input_path, &cli.output) {
        Ok(tally) => {
            info!(
                "Program exited normally - 成功: {}, 失敗: {}",
                tally.succeeded, tally.failed
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_batch_fatal() => Ok(report_fatal(&e)),
        Err(e) => Err(e.into()),
    }
}

fn report_fatal(err: &SheetError) -> ExitCode {
    error!("{err}");
    eprintln!("{} {}", style("錯誤:").red().bold(), err);

    match err {
        SheetError::Interrupted => ExitCode::from(INTERRUPT_EXIT_CODE),
        _ => ExitCode::from(NO_ACCELERATED_DECODER_EXIT_CODE),
    }
}
