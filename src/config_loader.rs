use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// 설정 로드 오류
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 오류
    #[error("설정 파일 오류: {0}")]
    FileError(String),
    /// 파싱 오류
    #[error("설정 파싱 오류: {0}")]
    ParseError(String),
    /// 유효성 검사 오류
    #[error("설정 유효성 검사 오류: {0}")]
    ValidationError(String),
}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON 형식
    Json,
    /// TOML 형식
    Toml,
    /// 자동 감지 (파일 확장자로부터)
    Auto,
}

/// 설정 유효성 검사 트레이트
pub trait ConfigValidation {
    /// 설정 유효성 검사
    fn validate(&self) -> ConfigResult<()>;
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (Auto 이면 확장자로 감지)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path)?,
            other => other,
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(&content)?,
            _ => Self::parse_toml(&content)?,
        };

        if let Err(e) = config.validate() {
            error!("설정 유효성 검사 실패: {}", e);
            return Err(e);
        }

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    ///
    /// `Auto` 형식이면 JSON 으로 먼저 시도한 뒤 실패하면 TOML 로 시도합니다.
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => match Self::parse_json::<T>(content) {
                Ok(config) => config,
                Err(_) => Self::parse_toml(content)?,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// 설정 파일 저장
    ///
    /// `Auto` 형식이면 확장자를 보고, 확장자가 없으면 TOML 로 저장합니다.
    pub fn save_to_file<T>(config: &T, path: &Path, format: ConfigFormat) -> ConfigResult<()>
    where
        T: Serialize + ConfigValidation,
    {
        debug!("설정 파일 저장 시작: {}", path.display());

        let format = match format {
            ConfigFormat::Auto => match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => ConfigFormat::Json,
                _ => ConfigFormat::Toml,
            },
            other => other,
        };

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("JSON 직렬화 실패: {}", e)))?,
            _ => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("TOML 직렬화 실패: {}", e)))?,
        };

        std::fs::write(path, &content).map_err(|e| {
            error!("설정 파일 쓰기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 쓰기 실패: {}", e))
        })?;

        info!("설정 파일 저장 완료: {}", path.display());
        Ok(())
    }

    /// JSON 파싱
    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    /// TOML 파싱
    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    /// 파일 형식 감지
    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}
