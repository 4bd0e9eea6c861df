use anyhow::Context;
use clap::Parser;
use mihara_ogp::{cli, config, middleware, server};
use cli::{Cli, Commands};
use config::Config;
use mihara_ogp_common::{Locale, PageMeta};
use server::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("設定の読み込みに失敗しました")?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Serve { listen, root, diagnostics } => {
            let config = Config {
                listen: listen.unwrap_or(config.listen),
                site_root: root.unwrap_or(config.site_root),
                diagnostics: diagnostics || config.diagnostics,
                ..config
            };

            println!("🗺  mihara-ogp - OGP書き換えサーバー\n");
            println!("  待ち受け: http://{}", config.listen);
            println!("  配信元: {}", config.site_root.display());
            for source in &config.sources {
                println!("  CSV: {} ({})", source.name, source.location);
            }
            println!(
                "  チャット中継: {}",
                if config.gemini.api_key.is_some() { "有効" } else { "APIキー未設定" }
            );
            println!();

            let state = AppState::from_config(config)?;
            server::start_server(state).await?;
        }

        Commands::Lookup { spot, lang } => {
            let locale = Locale::from(lang);
            let state = AppState::from_config(config)?;

            println!("[1/2] CSVを検索中...");
            let (record, source) = state.resolver.resolve(&spot).await.into_result(&spot)?;
            println!("✔ {} で見つかりました\n", source);

            println!("[2/2] 書き換え内容 ({})", locale);
            let meta = PageMeta::from_record(&record, locale, &state.config.site);
            let json = serde_json::json!({
                "source": source,
                "record": record,
                "meta": meta,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        Commands::Rewrite { input, spot, lang, output } => {
            let html = std::fs::read_to_string(&input)
                .with_context(|| format!("HTMLを読み込めません: {}", input.display()))?;
            let state = AppState::from_config(config)?;

            let resolution = state.resolver.resolve(&spot).await;
            let rewritten = middleware::render_html(&html, &resolution, lang.into(), None, &state.config);

            if resolution.record().is_none() {
                eprintln!("⚠ {}: 元のHTMLをそのまま出力します", resolution.outcome());
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, rewritten)?;
                    println!("✔ 書き換え結果を保存: {}", path.display());
                }
                None => print!("{}", rewritten),
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key, cli.config.as_deref())?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("{}", serde_json::to_string_pretty(&config.masked())?);
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
