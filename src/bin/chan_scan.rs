use anyhow::{Context, Result, bail};
use chan_structure::analyzer::ChanAnalyzer;
use chan_structure::config::AnalysisConfig;
use chan_structure::config_loader::{ConfigFormat, ConfigLoader};
use chan_structure::model::{OhlcCandle, TradeAction};
use chan_structure::scorer::{score_linked_from_daily, score_with_analyzer};
use clap::Parser;
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chan-scan")]
#[command(about = "봉 데이터(JSON)의 缠论 구조를 분석하고 매매 행동을 평가합니다")]
struct Args {
    /// 봉 데이터 JSON 파일 (OhlcCandle 배열, 시간순)
    bars: PathBuf,

    /// 분석 설정 파일 (TOML 또는 JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 평가할 행동 (buy, sell, hold)
    #[arg(short, long)]
    action: Option<TradeAction>,

    /// 현재 봉 인덱스 (기본: 마지막 봉)
    #[arg(short, long)]
    index: Option<usize>,

    /// 일/주/월 연동 평가
    #[arg(long)]
    linked: bool,
}

#[derive(Serialize)]
struct StructureSummary<'a> {
    bars: usize,
    structure: &'a chan_structure::ChanStructure,
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path, ConfigFormat::Auto)
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_bars(path: &Path) -> Result<Vec<OhlcCandle>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("봉 데이터 파일 읽기 실패: {}", path.display()))?;
    let mut bars: Vec<OhlcCandle> =
        serde_json::from_str(&content).context("봉 데이터 JSON 파싱 실패")?;
    bars.sort_by_key(|bar| bar.datetime);
    Ok(bars)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("인수: {:?}", args);

    let config = load_config(args.config.as_ref())?;
    let bars = load_bars(&args.bars)?;
    info!("봉 {}개 로드: {}", bars.len(), args.bars.display());

    if bars.is_empty() {
        bail!("봉 데이터가 비어 있습니다");
    }

    let index = args.index.unwrap_or(bars.len() - 1);
    if index >= bars.len() {
        bail!("인덱스 {} 가 봉 범위(0..{})를 벗어났습니다", index, bars.len());
    }
    let current = bars[..=index].to_vec();

    let output = match (args.action, args.linked) {
        (Some(action), true) => {
            let report = score_linked_from_daily(action, &bars, index, &config);
            info!("{}", report);
            serde_json::to_string_pretty(&report)?
        }
        (Some(action), false) => {
            let analyzer = ChanAnalyzer::new(config, current);
            let verdict = score_with_analyzer(action, &analyzer);
            info!("{}", verdict);
            serde_json::to_string_pretty(&verdict)?
        }
        (None, true) => bail!("--linked 는 --action 과 함께 사용해야 합니다"),
        (None, false) => {
            let analyzer = ChanAnalyzer::new(config, current);
            info!("{}", analyzer);
            serde_json::to_string_pretty(&StructureSummary {
                bars: analyzer.len(),
                structure: &analyzer.structure,
            })?
        }
    };

    println!("{}", output);
    Ok(())
}
