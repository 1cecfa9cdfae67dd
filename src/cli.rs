use anyhow::Result;
use clap::Parser;
use dialoguer::Input;
use std::path::PathBuf;

/// 預設輸出資料夾
pub const DEFAULT_OUTPUT_DIR: &str = "thumbnails_grid";

#[derive(Parser, Debug)]
#[command(
    name = "video-contact-sheet",
    version,
    about = "影片縮圖拼圖生成器（強制 GPU 解碼，每部影片輸出一張網格預覽圖）"
)]
pub struct Cli {
    /// 輸入路徑（資料夾或單一影片），省略時互動輸入
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: Option<PathBuf>,

    /// 輸出資料夾
    #[arg(short, long, value_name = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// 設定檔 (JSON)，未指定時讀取工作目錄下的 contact_sheet.json
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// 覆寫每部影片擷取的畫面數
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// 輸出目前生效的設定後結束
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    /// 取得輸入路徑，未提供時提示使用者輸入
    pub fn resolve_input_path(&self) -> Result<PathBuf> {
        match &self.input_path {
            Some(path) => Ok(path.clone()),
            None => prompt_input_path(),
        }
    }
}

fn prompt_input_path() -> Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("請輸入影片資料夾或影片路徑")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}
