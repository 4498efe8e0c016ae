use clap::Parser;
use dispatch_etl::core::report::write_report_bundle;
use dispatch_etl::core::ConfigProvider;
use dispatch_etl::utils::{logger, validation::Validate};
use dispatch_etl::{
    AssignmentPipeline, BatchRunner, CliConfig, HttpOrderStore, LocalStorage, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting dispatch-etl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 存儲連線設定來自 TOML 檔或命令行旗標
    let exit_code = match &cli.config {
        Some(config_path) => {
            let config = match TomlConfig::from_file(config_path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("❌ Failed to load config file {}: {}", config_path, e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            run_batch(&cli, &config).await
        }
        None => run_batch(&cli, &cli).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

async fn run_batch<C: ConfigProvider>(cli: &CliConfig, provider: &C) -> i32 {
    use dispatch_etl::core::Storage;

    // 讀取試算表
    let input_storage = LocalStorage::new(String::new());
    let bytes = match input_storage.read_file(&cli.input).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("❌ Failed to read {}: {}", cli.input, e);
            eprintln!("❌ Failed to read {}: {}", cli.input, e);
            return 1;
        }
    };

    // 創建存儲客戶端與批處理管道
    let store = HttpOrderStore::from_config(provider);
    let pipeline = AssignmentPipeline::new(store);
    let runner = BatchRunner::new(pipeline);

    let report = match runner.run(&bytes).await {
        Ok(report) => report,
        Err(e) => {
            // 解碼失敗屬於整批失敗，沒有部分報告
            tracing::error!("❌ Batch failed: {}", e);
            eprintln!("❌ Batch failed: {}", e);
            return 2;
        }
    };

    println!("✅ Batch complete");
    println!(
        "📊 Processed: {} | Successful: {} | Failed: {} | Invalid rows: {}",
        report.total_processed,
        report.successful,
        report.failed,
        report.invalid_rows.len()
    );

    for invalid in &report.invalid_rows {
        println!("  ⚠️ Row {}: {}", invalid.position, invalid.reason);
    }
    for outcome in report.details.iter().filter(|d| !d.success) {
        println!(
            "  ❌ {}: {}",
            outcome.order_number,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    if !cli.no_bundle {
        let report_storage = LocalStorage::new(provider.report_path().to_string());
        match write_report_bundle(&report_storage, &report).await {
            Ok(archive_name) => {
                println!(
                    "📁 Report bundle saved to: {}/{}",
                    provider.report_path(),
                    archive_name
                );
            }
            Err(e) => {
                tracing::error!("❌ Failed to write report bundle: {}", e);
                eprintln!("❌ Failed to write report bundle: {}", e);
                return 2;
            }
        }
    }

    0
}
