use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use tariff_core::{CountryTable, TariffError};

/// Заголовок User-Agent для запросов к сервису
pub(crate) const USER_AGENT: &str = concat!("tariff-cli/", env!("CARGO_PKG_VERSION"));

/// Таймаут HTTP-запроса по умолчанию, секунд
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to load country reference data: {path:?}")]
    Countries {
        path: PathBuf,
        #[source]
        source: TariffError,
    },
}

/// Загружает справочник стран.
///
/// Отсутствие файла не ошибка: возвращаем `None`, работают только цифровые коды.
pub(crate) fn load_countries(path: &Path) -> Result<Option<Arc<CountryTable>>, ConfigError> {
    match CountryTable::from_path(path) {
        Ok(table) => {
            info!("loaded {} countries from {:?}", table.len(), path);
            Ok(Some(Arc::new(table)))
        }
        Err(TariffError::MissingReferenceData) => {
            warn!("country file {path:?} not found; only numeric country codes are accepted");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Countries {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
