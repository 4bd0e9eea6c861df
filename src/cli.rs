use clap::{Parser, Subcommand, ValueEnum};
use mihara_ogp_common::Locale;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mihara-ogp")]
#[command(about = "三原市まち歩き PHOTO MAP のスポット別OGP書き換えサーバー", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 設定ファイル（省略時: ~/.config/mihara-ogp/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバーを起動
    Serve {
        /// 待ち受けアドレス（例: 0.0.0.0:8788）
        #[arg(short, long)]
        listen: Option<String>,

        /// 配信するHTMLのルートディレクトリ
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// 診断用metaタグを埋め込む
        #[arg(long)]
        diagnostics: bool,
    },

    /// スポットを検索して書き換え内容を表示
    Lookup {
        /// スポットのタイトル
        #[arg(required = true)]
        spot: String,

        /// 表示言語
        #[arg(short, long, default_value = "jp")]
        lang: Lang,
    },

    /// HTMLファイルをオフラインで書き換え
    Rewrite {
        /// 入力HTMLファイル
        #[arg(required = true)]
        input: PathBuf,

        /// スポットのタイトル
        #[arg(short, long)]
        spot: String,

        /// 表示言語
        #[arg(short, long, default_value = "jp")]
        lang: Lang,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Lang {
    Jp,
    En,
}

impl From<Lang> for Locale {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Jp => Locale::Jp,
            Lang::En => Locale::En,
        }
    }
}
